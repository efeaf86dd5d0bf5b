#[cfg(test)]
mod tests {
    use crate::models::RequestPayload;
    use bookline_common::BooklineError;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> RequestPayload {
        RequestPayload::from_slice(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_top_level_variables() {
        let query = payload(json!({
            "timezone": "America/Chicago",
            "startDate": "2024-01-01",
            "endDate": "2024-01-02"
        }))
        .availability_query();

        assert_eq!(query.timezone.as_deref(), Some("America/Chicago"));
        assert_eq!(query.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(query.end_date.as_deref(), Some("2024-01-02"));
    }

    #[test]
    fn test_nested_call_variables_win_over_top_level() {
        let query = payload(json!({
            "timeZone": "America/Denver",
            "call": {
                "retell_llm_dynamic_variables": {
                    "timeZone": "America/Los_Angeles",
                    "startDate": "2024-02-01"
                }
            }
        }))
        .availability_query();

        assert_eq!(query.timezone.as_deref(), Some("America/Los_Angeles"));
        assert_eq!(query.start_date.as_deref(), Some("2024-02-01"));
        assert!(query.end_date.is_none());
    }

    #[test]
    fn test_call_without_variables_falls_back_to_top_level() {
        let query = payload(json!({
            "timezone": "America/Denver",
            "call": { "call_id": "abc" }
        }))
        .availability_query();

        assert_eq!(query.timezone.as_deref(), Some("America/Denver"));
    }

    #[test]
    fn test_camel_case_timezone_preferred_and_blank_ignored() {
        let both = payload(json!({ "timeZone": "America/New_York", "timezone": "America/Chicago" }));
        assert_eq!(
            both.availability_query().timezone.as_deref(),
            Some("America/New_York")
        );

        let blank = payload(json!({ "timeZone": "", "timezone": "America/Chicago" }));
        assert_eq!(
            blank.availability_query().timezone.as_deref(),
            Some("America/Chicago")
        );
    }

    #[test]
    fn test_selection_fallbacks() {
        let camel = payload(json!({
            "timezone": "America/New_York",
            "selectedDateTime": "2024-01-01T09:00",
            "selected_date_time": "2024-01-01T10:00"
        }));
        assert_eq!(
            camel.booking_request().selected_date_time.as_deref(),
            Some("2024-01-01T09:00")
        );

        let snake = payload(json!({
            "timezone": "America/New_York",
            "selected_date_time": "2024-01-01T10:00"
        }));
        assert_eq!(
            snake.booking_request().selected_date_time.as_deref(),
            Some("2024-01-01T10:00")
        );
    }

    #[test]
    fn test_args_date_and_time_combine() {
        let request = payload(json!({
            "call": { "retell_llm_dynamic_variables": { "timezone": "America/New_York" } },
            "args": { "date": "2024-01-01", "time": "09:00 AM" }
        }))
        .booking_request();

        assert_eq!(request.timezone.as_deref(), Some("America/New_York"));
        assert_eq!(
            request.selected_date_time.as_deref(),
            Some("2024-01-01 09:00 AM")
        );
    }

    #[test]
    fn test_incomplete_args_leave_selection_unset() {
        let request = payload(json!({
            "timezone": "America/New_York",
            "args": { "date": "2024-01-01" }
        }))
        .booking_request();

        assert!(request.selected_date_time.is_none());
    }

    #[test]
    fn test_empty_body_is_empty_object() {
        let empty = RequestPayload::from_slice(b"").unwrap();
        assert!(empty.availability_query().timezone.is_none());

        let whitespace = RequestPayload::from_slice(b"  \n").unwrap();
        assert!(whitespace.booking_request().selected_date_time.is_none());
    }

    #[test]
    fn test_malformed_body_is_invalid_payload() {
        let err = RequestPayload::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, BooklineError::InvalidPayload(_)));

        let err = RequestPayload::from_slice(br#"{"timezone": 42}"#).unwrap_err();
        assert!(matches!(err, BooklineError::InvalidPayload(_)));
    }
}
