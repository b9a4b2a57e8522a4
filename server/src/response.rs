use actix_web::{http::StatusCode, HttpResponse};

pub(crate) fn json_error(
    status: StatusCode,
    message: impl Into<String>,
    code: Option<&str>,
) -> HttpResponse {
    let mut body = serde_json::json!({
        "ok": false,
        "error": message.into(),
    });
    if let Some(code) = code {
        body["code"] = serde_json::Value::String(code.to_string());
    }
    HttpResponse::build(status).json(body)
}
