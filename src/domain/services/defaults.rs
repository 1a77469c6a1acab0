/// Built-in (subject, body) per booking status, used when no enabled template
/// is stored for the status and language.
pub fn get_default_template(status: &str) -> (String, String) {
    match status {
        "pending" => (DEFAULT_PENDING_SUBJECT.to_string(), include_str!("../../../templates/defaults/pending.html").to_string()),
        "approved" => (DEFAULT_APPROVED_SUBJECT.to_string(), include_str!("../../../templates/defaults/approved.html").to_string()),
        "cancelled" => (DEFAULT_CANCELLED_SUBJECT.to_string(), include_str!("../../../templates/defaults/cancelled.html").to_string()),
        "waitlisted" => (DEFAULT_WAITLISTED_SUBJECT.to_string(), include_str!("../../../templates/defaults/waitlisted.html").to_string()),
        _ => (
            format!("{{{{ business.name }}}}: {}", status),
            format!("<p>Booking {{{{ booking_code }}}} is now {}.</p>", status),
        ),
    }
}

pub const DEFAULT_PENDING_SUBJECT: &str = "אישור שריון הזמנה - {{ booking_code }}";
pub const DEFAULT_APPROVED_SUBJECT: &str = "ההזמנה אושרה - {{ booking_code }}";
pub const DEFAULT_CANCELLED_SUBJECT: &str = "ההזמנה בוטלה - {{ booking_code }}";
pub const DEFAULT_WAITLISTED_SUBJECT: &str = "ההזמנה ברשימת המתנה - {{ booking_code }}";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates_exist() {
        for status in ["pending", "approved", "cancelled", "waitlisted"] {
            let (subject, body) = get_default_template(status);
            assert!(subject.contains("{{ booking_code }}"), "{} subject missing code", status);
            assert!(body.contains("{{ booking_code }}"), "{} body missing code", status);
            assert!(body.contains("{{ business.name }}"), "{} body missing business name", status);
        }

        let (_, fallback) = get_default_template("completed");
        assert_eq!(fallback, "<p>Booking {{ booking_code }} is now completed.</p>");
    }
}
