//! Client-side form validation. Every form is checked before a request is made
//! and the first failing field is reported.

use crate::core::api::file_part;
use crate::domain::model::PetStatus;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{
    require_text, validate_email, validate_file_extensions, validate_length, Validate,
};
use reqwest::multipart::Form;
use serde::Serialize;
use std::path::PathBuf;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
pub const MAX_PET_IMAGES: usize = 5;
pub const MAX_PET_AGE: u32 = 30;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct PetForm {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub status: Option<PetStatus>,
    pub images: Vec<PathBuf>,
}

impl Validate for PetForm {
    fn validate(&self) -> Result<()> {
        validate_length("name", &self.name, 1, 50)?;
        require_text("species", &self.species)?;
        if let Some(age) = self.age {
            if age > MAX_PET_AGE {
                return Err(ClientError::validation(
                    "age",
                    format!("must be at most {} years", MAX_PET_AGE),
                ));
            }
        }
        if let Some(description) = &self.description {
            validate_length("description", description, 0, 1000)?;
        }
        if self.images.len() > MAX_PET_IMAGES {
            return Err(ClientError::validation(
                "images",
                format!("at most {} images can be attached", MAX_PET_IMAGES),
            ));
        }
        let names: Vec<String> = self
            .images
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        validate_file_extensions("images", &names, IMAGE_EXTENSIONS)?;
        Ok(())
    }
}

impl PetForm {
    /// 組成 multipart 表單：文字欄位加上 `images` 檔案
    pub async fn to_multipart(&self) -> Result<Form> {
        let mut form = Form::new()
            .text("name", self.name.trim().to_string())
            .text("species", self.species.trim().to_string());

        let optional = [
            ("breed", &self.breed),
            ("gender", &self.gender),
            ("size", &self.size),
            ("location", &self.location),
            ("description", &self.description),
        ];
        for (key, value) in optional {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                form = form.text(key, v.to_string());
            }
        }
        if let Some(age) = self.age {
            form = form.text("age", age.to_string());
        }
        if let Some(status) = self.status {
            form = form.text("status", status.as_str());
        }

        for image in &self.images {
            form = form.part("images", file_part(image).await?);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<()> {
        validate_email("email", &self.email)?;
        if self.password.is_empty() {
            return Err(ClientError::validation("password", "is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        validate_email("email", &self.email)?;
        check_new_password("password", &self.password, &self.confirm_password)
    }
}

fn check_new_password(field: &str, password: &str, confirmation: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::validation(
            field,
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    if password != confirmation {
        return Err(ClientError::validation("confirm_password", "passwords do not match"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupForm {
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Validate for GroupForm {
    fn validate(&self) -> Result<()> {
        validate_length("name", &self.name, 3, 50)?;
        validate_length("description", &self.description, 0, 500)?;
        require_text("category", &self.category)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PostForm {
    pub content: String,
}

impl Validate for PostForm {
    fn validate(&self) -> Result<()> {
        validate_length("content", &self.content, 1, 2000)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Validate for ProfileUpdate {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(bio) = &self.bio {
            validate_length("bio", bio, 0, 500)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl Validate for PasswordChange {
    fn validate(&self) -> Result<()> {
        if self.current_password.is_empty() {
            return Err(ClientError::validation("current_password", "is required"));
        }
        check_new_password("new_password", &self.new_password, &self.confirm_password)?;
        if self.new_password == self.current_password {
            return Err(ClientError::validation(
                "new_password",
                "must differ from the current password",
            ));
        }
        Ok(())
    }
}
