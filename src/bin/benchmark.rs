use chrono::{Datelike, Duration as ChronoDuration, Utc, Weekday};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const DURATION_SECS: u64 = 20;
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

struct Target {
    name: &'static str,
    method: &'static str,
    url: String,
    body: Option<Value>,
    /// Conflicts are an expected answer for contended writes.
    accept_conflict: bool,
}

#[tokio::main]
async fn main() {
    let base_url = std::env::var("BENCH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base_url);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("❌ Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    println!("\n{}", "⚙️  Checking benchmark data...".yellow());
    let rooms = active_rooms(&client, &base_url).await;
    if rooms == 0 {
        eprintln!("{}", "❌ No active rooms. Seed at least one room before benchmarking.".red().bold());
        return;
    }

    // A Sunday a few weeks out: open in the default schedule and clear of today's cutoff.
    let mut date = Utc::now().date_naive() + ChronoDuration::days(21);
    while date.weekday() != Weekday::Sun {
        date += ChronoDuration::days(1);
    }
    let date = date.format("%Y-%m-%d").to_string();

    println!("{}", "✅ Ready.".green());
    println!("   Active rooms: {}", rooms);
    println!("   Date:         {}", date);

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: "GET",
            url: format!("{}/health", base_url),
            body: None,
            accept_conflict: false,
        },
        Target {
            name: "Day Hours (Public Read)",
            method: "GET",
            url: format!("{}/api/v1/business-hours/{}", base_url, date),
            body: None,
            accept_conflict: false,
        },
        Target {
            name: "Availability Check (Read Path)",
            method: "POST",
            url: format!("{}/api/v1/availability", base_url),
            body: Some(json!({
                "date": date,
                "startTime": "20:00",
                "durationHours": 2,
                "guestCount": 2
            })),
            accept_conflict: false,
        },
        Target {
            name: "Create Booking (Contended Write)",
            method: "POST",
            url: format!("{}/api/v1/bookings", base_url),
            body: Some(json!({
                "date": date,
                "startTime": "18:00",
                "durationHours": 1,
                "guestCount": 2,
                "customer": { "name": "Bench Bot", "phone": "000-0000000" }
            })),
            accept_conflict: true,
        },
    ];

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps).await;
        }
    }
}

async fn active_rooms(client: &Client, base_url: &str) -> usize {
    let res = client.get(format!("{}/api/v1/rooms", base_url))
        .send()
        .await
        .expect("Failed to list rooms");

    if !res.status().is_success() {
        panic!("Failed to list rooms: status {}", res.status());
    }

    let body: Value = res.json().await.expect("Failed to parse rooms response");
    body.as_array().map(Vec::len).unwrap_or(0)
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).unwrap())
    ));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let body = target.body.clone();
            let method = target.method;
            let accept_conflict = target.accept_conflict;
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = match method {
                    "POST" => {
                        let mut req = client.post(&url);
                        if let Some(b) = body {
                            req = req.json(&b);
                        }
                        req.send().await
                    },
                    _ => client.get(&url).send().await,
                };
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success() || (accept_conflict && r.status() == StatusCode::CONFLICT),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        histogram.record(latency.as_micros() as u64).unwrap();
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}
