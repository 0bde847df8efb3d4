/*
[INPUT]:  Credentials, email addresses, reset codes
[OUTPUT]: Login results and password-reset acknowledgements
[POS]:    HTTP layer - account endpoints (no session token required)
[UPDATE]: When auth endpoints or payloads change
*/

// ### Account Endpoints

use reqwest::Method;

use crate::http::{AdapterError, CleanlineClient, Result};
use crate::types::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest,
    VerifyCodeRequest,
};

impl CleanlineClient {
    /// Sign in with email and password
    ///
    /// POST /api/auth/login
    ///
    /// Any client-error refusal is reported as `Authentication`.
    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        let builder = self.request(Method::POST, "/api/auth/login")?.json(req);
        self.send_json(builder).await.map_err(|err| match err {
            AdapterError::Api { code, message } if (400..500).contains(&code) => {
                AdapterError::Authentication { message }
            }
            AdapterError::Forbidden(message) => AdapterError::Authentication { message },
            other => other,
        })
    }

    /// Ask the backend to email a reset code
    ///
    /// POST /api/auth/forgot-password
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        let req = ForgotPasswordRequest {
            email: email.to_string(),
        };
        let builder = self
            .request(Method::POST, "/api/auth/forgot-password")?
            .json(&req);
        self.send_json(builder).await
    }

    /// Check a reset code
    ///
    /// POST /api/auth/verify-code
    pub async fn verify_reset_code(&self, email: &str, code: &str) -> Result<MessageResponse> {
        let req = VerifyCodeRequest {
            email: email.to_string(),
            code: code.to_string(),
        };
        let builder = self.request(Method::POST, "/api/auth/verify-code")?.json(&req);
        self.send_json(builder).await
    }

    /// Set a new password using a verified code
    ///
    /// POST /api/auth/reset-password
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        password: &str,
    ) -> Result<MessageResponse> {
        let req = ResetPasswordRequest {
            email: email.to_string(),
            code: code.to_string(),
            password: password.to_string(),
        };
        let builder = self
            .request(Method::POST, "/api/auth/reset-password")?
            .json(&req);
        self.send_json(builder).await
    }
}
