use crate::core::api::ApiClient;
use crate::core::forms::{LoginForm, RegisterForm};
use crate::domain::model::{AuthResponse, Role, Session, User};
use crate::utils::error::{ClientError, Result, LOGIN_PATH};
use crate::utils::validation::Validate;
use serde_json::json;

pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    PetDetail(String),
    PostPet,
    EditPet(String),
    MyPets,
    Favorites,
    Groups,
    GroupDetail(String),
    Profile,
    Account,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    GuestOnly,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => HOME_PATH.to_string(),
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => "/register".to_string(),
            Route::PetDetail(id) => format!("/pets/{}", id),
            Route::PostPet => "/post-pet".to_string(),
            Route::EditPet(id) => format!("/pets/{}/edit", id),
            Route::MyPets => "/my-pets".to_string(),
            Route::Favorites => "/favorites".to_string(),
            Route::Groups => "/groups".to_string(),
            Route::GroupDetail(id) => format!("/groups/{}", id),
            Route::Profile => "/profile".to_string(),
            Route::Account => "/account".to_string(),
            Route::Admin => "/admin".to_string(),
        }
    }

    pub fn access(&self) -> RouteAccess {
        match self {
            Route::Home | Route::PetDetail(_) | Route::Groups | Route::GroupDetail(_) => {
                RouteAccess::Public
            }
            Route::Login | Route::Register => RouteAccess::GuestOnly,
            Route::PostPet
            | Route::EditPet(_)
            | Route::MyPets
            | Route::Favorites
            | Route::Profile
            | Route::Account => RouteAccess::Authenticated,
            Route::Admin => RouteAccess::Admin,
        }
    }
}

/// 登入狀態：每次都從 SessionStore 讀取，401 清除後立即反映
#[derive(Clone)]
pub struct AuthContext {
    api: ApiClient,
}

impl AuthContext {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> Result<Option<Session>> {
        self.api.session().load()
    }

    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.session()?.map(|s| s.token))
    }

    pub fn current_user(&self) -> Result<Option<User>> {
        Ok(self.session()?.and_then(|s| s.user))
    }

    pub fn role(&self) -> Result<Option<Role>> {
        Ok(self.session()?.and_then(|s| s.role()))
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.session()?.is_some())
    }

    pub fn is_admin(&self) -> Result<bool> {
        Ok(self.role()? == Some(Role::Admin))
    }

    pub async fn login(&self, form: &LoginForm) -> Result<User> {
        form.validate()?;
        tracing::info!("Logging in as {}", form.email);

        let response: AuthResponse = self
            .api
            .post(
                "/auth/login",
                &json!({ "email": form.email.trim(), "password": form.password }),
            )
            .await?;
        self.store(response)
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<User> {
        form.validate()?;
        tracing::info!("Registering new account for {}", form.email);

        let response: AuthResponse = self
            .api
            .post(
                "/auth/register",
                &json!({
                    "name": form.name.trim(),
                    "email": form.email.trim(),
                    "password": form.password,
                }),
            )
            .await?;
        self.store(response)
    }

    fn store(&self, response: AuthResponse) -> Result<User> {
        let user = response.user.clone();
        self.api.session().save(&Session {
            token: response.token,
            user: Some(response.user),
        })?;
        tracing::debug!("Session stored for user {}", user.id);
        Ok(user)
    }

    pub fn logout(&self) -> Result<()> {
        tracing::info!("Logging out");
        self.api.session().clear()
    }

    /// 重新取得目前使用者資料並更新本機狀態
    pub async fn refresh_user(&self) -> Result<Option<User>> {
        let Some(mut session) = self.session()? else {
            return Ok(None);
        };

        let user: User = self.api.get("/auth/me").await?;
        session.user = Some(user.clone());
        self.api.session().save(&session)?;
        Ok(Some(user))
    }

    pub fn guard(&self, route: &Route) -> Result<Navigation> {
        let session = self.session()?;
        Ok(decide(route, session.as_ref()))
    }

    /// 被導向時回傳錯誤：導向登入頁為 Unauthorized，其餘為 Forbidden
    pub fn require(&self, route: &Route) -> Result<()> {
        self.guard(route)?.into_result(route)
    }
}

impl Navigation {
    pub fn into_result(self, route: &Route) -> Result<()> {
        match self {
            Navigation::Allow => Ok(()),
            Navigation::Redirect(to) if to == LOGIN_PATH => {
                Err(ClientError::UnauthorizedError { redirect_to: to })
            }
            Navigation::Redirect(to) => Err(ClientError::ForbiddenError {
                message: format!(
                    "{} is not available for this account (redirects to {})",
                    route.path(),
                    to
                ),
            }),
        }
    }
}

/// 路由守衛的判斷邏輯
pub fn decide(route: &Route, session: Option<&Session>) -> Navigation {
    match (route.access(), session) {
        (RouteAccess::Public, _) => Navigation::Allow,
        (RouteAccess::GuestOnly, None) => Navigation::Allow,
        (RouteAccess::GuestOnly, Some(_)) => Navigation::Redirect(HOME_PATH.to_string()),
        (RouteAccess::Authenticated, Some(_)) => Navigation::Allow,
        (RouteAccess::Authenticated | RouteAccess::Admin, None) => {
            Navigation::Redirect(LOGIN_PATH.to_string())
        }
        (RouteAccess::Admin, Some(s)) if s.role() == Some(Role::Admin) => Navigation::Allow,
        (RouteAccess::Admin, Some(_)) => Navigation::Redirect(HOME_PATH.to_string()),
    }
}
