//! Response Envelope
//!
//! Every JSON body returned by the API, success or failure, has the shape
//! `{"status": ..., "message": ..., "data"?: ..., "token"?: ...}`.

use serde::Serialize;
use std::borrow::Cow;

/// レスポンスの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// 共通レスポンスエンベロープ
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub message: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl<T> ApiResponse<T> {
    /// 成功レスポンス
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Cow::Borrowed("success"),
            data: Some(data),
            token: None,
        }
    }

    /// ログイン時などトークンを同梱する
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl ApiResponse<serde_json::Value> {
    /// エラーレスポンス
    pub fn error(message: impl Into<Cow<'static, str>>, data: Option<serde_json::Value>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            data,
            token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serialization() {
        let body = ApiResponse::success(serde_json::json!({ "username": "alice" }));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "success");
        assert_eq!(json["data"]["username"], "alice");
        assert!(json.get("token").is_none());
    }

    #[test]
    fn test_success_with_token() {
        let body = ApiResponse::success(1).with_token("abc.def.ghi");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["token"], "abc.def.ghi");
    }

    #[test]
    fn test_error_omits_empty_data() {
        let body = ApiResponse::error("unauthorized", None);
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"status":"error","message":"unauthorized"}"#);
    }
}
