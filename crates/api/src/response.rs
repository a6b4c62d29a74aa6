//! Success response envelopes.
//!
//! Every successful response carries `success: true`; list responses also
//! carry a `count` alongside the data.

use serde::Serialize;

/// Envelope for a single resource.
#[derive(Debug, Serialize)]
pub struct DataResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Envelope for a collection of resources.
#[derive(Debug, Serialize)]
pub struct ListResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Envelope for operations that return only a confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_response_shape() {
        let json = serde_json::to_value(DataResponse::new(42)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
    }

    #[test]
    fn test_list_response_counts_items() {
        let json = serde_json::to_value(ListResponse::new(vec!["a", "b", "c"])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 3);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_message_response_shape() {
        let json =
            serde_json::to_value(MessageResponse::new("Event deleted successfully")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Event deleted successfully");
    }
}
