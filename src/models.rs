use serde::Serialize;

/// Response envelope shared by every JSON endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(mensaje: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(mensaje.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_ok_omite_error() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn envelope_error_omite_data() {
        let json = serde_json::to_value(ApiResponse::<()>::error("algo falló")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "algo falló"})
        );
    }
}
