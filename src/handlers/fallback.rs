use axum::{http::StatusCode, response::IntoResponse};

pub async fn fallback_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "Not found. Valid endpoints: /, /settings, /run, /health",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fallback_is_404() {
        let response = fallback_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
