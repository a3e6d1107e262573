use std::{marker::PhantomData, ops::Deref};

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::{database::types::Role, errors::AppError, services::auth::Claims};

/// Authenticated caller, produced by the authentication middleware.
#[derive(Clone, Debug, PartialEq)]
pub struct Principal {
    pub user_id: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl Principal {
    pub fn has_role(&self, required: Role) -> bool {
        match required {
            Role::Admin => matches!(self.role, Role::Admin),
            Role::Owner => matches!(self.role, Role::Owner),
            Role::Employee => matches!(self.role, Role::Employee),
        }
    }
}

/// Compile-time role requirement for [`Authorized`].
pub trait RoleGuard {
    const ROLE: Role;
}

pub enum AdminRole {}
pub enum OwnerRole {}
pub enum EmployeeRole {}

impl RoleGuard for AdminRole {
    const ROLE: Role = Role::Admin;
}

impl RoleGuard for OwnerRole {
    const ROLE: Role = Role::Owner;
}

impl RoleGuard for EmployeeRole {
    const ROLE: Role = Role::Employee;
}

/// Extractor that only succeeds for a caller holding the guard's role.
///
/// Missing session and wrong role both answer 401.
pub struct Authorized<G: RoleGuard> {
    principal: Principal,
    _guard: PhantomData<G>,
}

pub type AdminPrincipal = Authorized<AdminRole>;
pub type OwnerPrincipal = Authorized<OwnerRole>;
pub type EmployeePrincipal = Authorized<EmployeeRole>;

impl<G: RoleGuard> Deref for Authorized<G> {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.principal
    }
}

pub fn authorize<G: RoleGuard>(req: &HttpRequest) -> Result<Authorized<G>, AppError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .cloned()
        .ok_or_else(AppError::unauthorized)?;

    if !principal.has_role(G::ROLE) {
        log::warn!(
            "User {} with role {} tried to access {} ({} required)",
            principal.user_id,
            principal.role,
            req.path(),
            G::ROLE
        );
        return Err(AppError::unauthorized());
    }

    Ok(Authorized {
        principal,
        _guard: PhantomData,
    })
}

impl<G: RoleGuard> FromRequest for Authorized<G> {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize::<G>(req))
    }
}
