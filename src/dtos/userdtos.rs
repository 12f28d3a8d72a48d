use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::usermodel::User;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct UserQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            email: user.email.to_owned(),
            role: user.role.to_str().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<FilterUserDto> {
        users.iter().map(FilterUserDto::filter_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponseDto {
    pub status: String,
    pub users: Vec<FilterUserDto>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_dto_rejects_missing_fields() {
        let dto = RegisterUserDto {
            name: "".to_string(),
            email: "ann@x.com".to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret1".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = RegisterUserDto {
            name: "Ann".to_string(),
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret1".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_dto_rejects_mismatched_passwords() {
        let dto = RegisterUserDto {
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret2".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_dto_accepts_valid_input() {
        let dto = RegisterUserDto {
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret1".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn login_dto_requires_password_length() {
        let dto = LoginUserDto {
            email: "ann@x.com".to_string(),
            password: "short".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
