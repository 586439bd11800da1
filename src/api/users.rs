use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ClientError, StorefrontClient};
use crate::jwt::UserRole;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Body of a successful login. Older backends name the credential field
/// differently; all spellings land in `token`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken", alias = "jwt", alias = "authToken")]
    pub token: Option<String>,
}

/// Account registration form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    /// Avatar URL, empty when not provided
    pub image_url: String,
}

impl SignupRequest {
    /// Copy with surrounding whitespace removed from names and email, so
    /// the account can later log in with the same trimmed email.
    fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role,
            image_url: self.image_url.trim().to_string(),
        }
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ClientError::invalid("First and last name are required"));
        }
        validate_credentials(&self.email, &self.password)
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ClientError> {
    if email.trim().is_empty() {
        return Err(ClientError::invalid("Email is required"));
    }
    if !email.contains('@') {
        return Err(ClientError::invalid("Email address is not valid"));
    }
    if password.is_empty() {
        return Err(ClientError::invalid("Password is required"));
    }
    Ok(())
}

impl StorefrontClient {
    /// `POST /api/users/login`. Returns the issued credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let email = email.trim();
        validate_credentials(email, password)?;

        let response = self
            .http
            .post(self.endpoint("api/users/login")?)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let body: LoginResponse = Self::parse(response).await?;
        let token = body
            .token
            .filter(|t| !t.is_empty())
            .ok_or(ClientError::MissingToken)?;

        info!(email = %email, "Login accepted");
        Ok(token)
    }

    /// `POST /api/users/signup`. Returns a credential if the backend
    /// signs the new account in directly.
    pub async fn signup(&self, request: &SignupRequest) -> Result<Option<String>, ClientError> {
        let request = request.trimmed();
        request.validate()?;

        let response = self
            .http
            .post(self.endpoint("api/users/signup")?)
            .json(&request)
            .send()
            .await?;

        let response = Self::check(response).await?;
        let token = response
            .json::<LoginResponse>()
            .await
            .ok()
            .and_then(|body| body.token)
            .filter(|t| !t.is_empty());

        debug!(signed_in = token.is_some(), "Signup accepted");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_aliases() {
        for field in ["token", "accessToken", "jwt", "authToken"] {
            let body = format!(r#"{{"{}":"a.b.c"}}"#, field);
            let parsed: LoginResponse = serde_json::from_str(&body).unwrap();
            assert_eq!(parsed.token.as_deref(), Some("a.b.c"), "field {}", field);
        }

        let parsed: LoginResponse = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert_eq!(parsed.token, None);
    }

    #[test]
    fn test_signup_request_wire_format() {
        let request = SignupRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "engine".into(),
            role: UserRole::User,
            image_url: String::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["lastName"], "Lovelace");
        assert_eq!(value["role"], "user");
        assert_eq!(value["imageUrl"], "");
    }

    #[test]
    fn test_validation() {
        assert!(validate_credentials("a@b.c", "pw").is_ok());
        assert!(matches!(
            validate_credentials("", "pw"),
            Err(ClientError::Invalid(_))
        ));
        assert!(matches!(
            validate_credentials("not-an-email", "pw"),
            Err(ClientError::Invalid(_))
        ));
        assert!(matches!(
            validate_credentials("a@b.c", ""),
            Err(ClientError::Invalid(_))
        ));

        let request = SignupRequest {
            first_name: " ".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "engine".into(),
            role: UserRole::User,
            image_url: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_signup_request_trimmed() {
        let request = SignupRequest {
            first_name: " Ada ".into(),
            last_name: "Lovelace\n".into(),
            email: "  ada@example.com ".into(),
            password: " engine ".into(),
            role: UserRole::Admin,
            image_url: " ".into(),
        };
        let trimmed = request.trimmed();
        assert_eq!(trimmed.first_name, "Ada");
        assert_eq!(trimmed.last_name, "Lovelace");
        assert_eq!(trimmed.email, "ada@example.com");
        // Passwords are sent exactly as typed
        assert_eq!(trimmed.password, " engine ");
        assert_eq!(trimmed.role, UserRole::Admin);
        assert_eq!(trimmed.image_url, "");
    }
}
