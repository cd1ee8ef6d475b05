use std::sync::Arc;

use crate::{
    auth::{JwtService, PasswordService},
    errors::{AppError, AppResult},
    models::{
        domain::{NewUser, User},
        dto::{
            request::{LoginRequest, RegisterRequest},
            response::{AuthResponse, UserDto},
        },
    },
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    passwords: PasswordService,
    jwt: JwtService,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        passwords: PasswordService,
        jwt: JwtService,
    ) -> Self {
        Self {
            repository,
            passwords,
            jwt,
        }
    }

    async fn hash_password(&self, password: &str) -> AppResult<String> {
        let passwords = self.passwords.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || passwords.hash(&password)).await?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let passwords = self.passwords.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || passwords.verify(&password, &hash)).await?
    }

    fn issue(&self, user: User) -> AppResult<AuthResponse> {
        let token = self.jwt.create_token(&user)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.check()?;

        let password_hash = self.hash_password(&request.password).await?;
        let new_user = NewUser::new(&request.regno, request.name.as_deref(), password_hash);
        let user = self.repository.create(new_user).await?;

        log::info!("Registered user {} ({})", user.id, user.regno);
        self.issue(user)
    }

    /// Unknown registration numbers and wrong passwords fail identically.
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.check()?;

        let Some(user) = self.repository.find_by_regno(request.regno.trim()).await? else {
            return Err(AppError::InvalidCredentials);
        };

        if !self
            .verify_password(&request.password, &user.password_hash)
            .await?
        {
            return Err(AppError::InvalidCredentials);
        }

        self.issue(user)
    }

    pub async fn get_user(&self, id: i64) -> AppResult<UserDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserDto>> {
        let users = self.repository.find_all().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    /// Reads the admin flag fresh from the store.
    pub async fn require_admin(&self, id: i64) -> AppResult<User> {
        match self.repository.find_by_id(id).await? {
            Some(user) if user.is_admin => Ok(user),
            _ => Err(AppError::Forbidden("Admin access required".to_string())),
        }
    }

    pub async fn set_admin(&self, id: i64, is_admin: bool) -> AppResult<UserDto> {
        if !self.repository.set_admin(id, is_admin).await? {
            return match self.repository.find_by_id(id).await? {
                None => Err(AppError::NotFound("User not found".to_string())),
                Some(_) => Err(AppError::ValidationError(
                    "Cannot remove the last remaining admin".to_string(),
                )),
            };
        }

        let user = self.get_user(id).await?;
        log::info!(
            "Set admin flag of user {} ({}) to {}",
            user.id,
            user.regno,
            user.is_admin
        );
        Ok(user)
    }

    /// Makes sure the configured bootstrap account exists and is an admin.
    pub async fn ensure_admin(&self, regno: &str, password: &str) -> AppResult<UserDto> {
        if let Some(existing) = self.repository.find_by_regno(regno.trim()).await? {
            if existing.is_admin {
                return Ok(existing.into());
            }
            return self.set_admin(existing.id, true).await;
        }

        let password_hash = self.hash_password(password).await?;
        let user = self
            .repository
            .create(NewUser::new(regno, None, password_hash).admin())
            .await?;

        log::info!("Created bootstrap admin {} ({})", user.id, user.regno);
        Ok(user.into())
    }
}
