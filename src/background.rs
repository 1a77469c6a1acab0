use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn, info_span, Instrument};
use crate::state::AppState;
use crate::domain::models::job::{Job, JOB_TYPE_NOTIFY};
use crate::error::AppError;

const BATCH_SIZE: i32 = 10;

pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background job worker...");
    let interval = Duration::from_secs(state.config.worker_poll_interval_secs.max(1));

    loop {
        process_pending_jobs(&state).await;
        sleep(interval).await;
    }
}

/// Claims one batch of due jobs and runs them. Returns how many were claimed.
pub async fn process_pending_jobs(state: &AppState) -> usize {
    let jobs = match state.job_repo.find_pending(BATCH_SIZE).await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Failed to fetch pending jobs: {:?}", e);
            return 0;
        }
    };
    let claimed = jobs.len();

    for job in jobs {
        let span = info_span!(
            "background_job",
            job_id = %job.id,
            job_type = %job.job_type,
            booking_id = %job.payload.booking_id,
        );

        async {
            info!("Processing job: {}", job.job_type);
            match process_job(state, &job).await {
                Ok(_) => {
                    info!("Job completed successfully");
                    if let Err(e) = state.job_repo.update_status(&job.id, "COMPLETED", None).await {
                        error!("Failed to mark job as completed: {:?}", e);
                    }
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    warn!("Job failed with error: {}", err_msg);
                    if let Err(up_err) = state.job_repo.update_status(&job.id, "FAILED", Some(err_msg)).await {
                        error!("Failed to mark job as failed: {:?}", up_err);
                    }
                }
            }
        }
            .instrument(span)
            .await;
    }

    claimed
}

async fn process_job(state: &AppState, job: &Job) -> Result<(), AppError> {
    if job.job_type != JOB_TYPE_NOTIFY {
        return Err(AppError::InternalWithMsg(format!("Unknown job type {}", job.job_type)));
    }

    let booking_id = &job.payload.booking_id;
    let booking = state.booking_repo.find_by_id(booking_id).await?
        .ok_or(AppError::NotFound(format!("Booking {} not found", booking_id)))?;

    state.notifier.notify(&job.id, &booking, job.payload.event).await
}
