//! Shared test support: in-memory repositories and request helpers.
//!
//! The in-memory stores evaluate the same `LeadFilter` / `UserScope` values
//! the SQL stores translate, so service behaviour can be tested without a
//! database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use lead_crm::api::{create_router, AppState};
use lead_crm::config::Config;
use lead_crm::domain::{
    CreateLead, Identity, Lead, LeadChanges, LeadFilter, LeadStatus, User, UserRole, UserScope,
};
use lead_crm::errors::{AppError, AppResult};
use lead_crm::infra::{LeadRepository, UnitOfWork, UserRepository};
use lead_crm::services::{Claims, Services};

// =============================================================================
// In-memory repositories
// =============================================================================

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn list(&self, scope: UserScope) -> AppResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        let mut matching: Vec<User> = users.iter().filter(|u| scope.matches(u)).cloned().collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching)
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("User"));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id == id).map(|u| {
            u.is_active = is_active;
            u.updated_at = Utc::now();
            u.clone()
        }))
    }
}

#[derive(Default)]
pub struct InMemoryLeads {
    leads: Mutex<Vec<Lead>>,
}

impl InMemoryLeads {
    pub fn get(&self, id: Uuid) -> Option<Lead> {
        self.leads.lock().unwrap().iter().find(|l| l.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.leads.lock().unwrap().len()
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeads {
    async fn find(&self, filter: LeadFilter, limit: Option<u64>) -> AppResult<Vec<Lead>> {
        let leads = self.leads.lock().unwrap();
        let mut matching: Vec<Lead> = leads.iter().filter(|l| filter.matches(l)).cloned().collect();
        matching.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        if let Some(limit) = limit {
            matching.truncate(limit as usize);
        }
        Ok(matching)
    }

    async fn find_one(&self, filter: LeadFilter) -> AppResult<Option<Lead>> {
        let leads = self.leads.lock().unwrap();
        Ok(leads.iter().find(|l| filter.matches(l)).cloned())
    }

    async fn count(&self, filter: LeadFilter) -> AppResult<u64> {
        let leads = self.leads.lock().unwrap();
        Ok(leads.iter().filter(|l| filter.matches(l)).count() as u64)
    }

    async fn sum_value(&self, filter: LeadFilter) -> AppResult<f64> {
        let leads = self.leads.lock().unwrap();
        Ok(leads
            .iter()
            .filter(|l| filter.matches(l))
            .map(|l| l.value)
            .sum())
    }

    async fn insert(&self, lead: Lead) -> AppResult<Lead> {
        self.leads.lock().unwrap().push(lead.clone());
        Ok(lead)
    }

    async fn update_one(
        &self,
        filter: LeadFilter,
        changes: LeadChanges,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Lead>> {
        let mut leads = self.leads.lock().unwrap();
        Ok(leads.iter_mut().find(|l| filter.matches(l)).map(|lead| {
            lead.apply(changes, now);
            lead.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut leads = self.leads.lock().unwrap();
        let before = leads.len();
        leads.retain(|l| l.id != id);
        Ok(leads.len() < before)
    }

    async fn reassign(&self, from: Uuid, to: Option<Uuid>) -> AppResult<u64> {
        let mut leads = self.leads.lock().unwrap();
        let mut moved = 0;
        for lead in leads.iter_mut().filter(|l| l.assigned_to == Some(from)) {
            lead.assigned_to = to;
            moved += 1;
        }
        Ok(moved)
    }
}

// =============================================================================
// Fixture
// =============================================================================

/// Unit of Work over the in-memory stores, plus helpers to populate them
#[derive(Clone, Default)]
pub struct Store {
    pub users: Arc<InMemoryUsers>,
    pub leads: Arc<InMemoryLeads>,
}

impl UnitOfWork for Store {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn leads(&self) -> Arc<dyn LeadRepository> {
        self.leads.clone()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, name: &str, role: UserRole) -> User {
        let email = format!("{}@company.com", name.to_lowercase().replace(' ', "."));
        let user = User::new(name.to_string(), email, "not-a-real-hash".into(), role);
        self.users.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn add_inactive_user(&self, name: &str, role: UserRole) -> User {
        let mut user = self.add_user(name, role);
        user.is_active = false;
        let mut users = self.users.users.lock().unwrap();
        if let Some(stored) = users.iter_mut().find(|u| u.id == user.id) {
            stored.is_active = false;
        }
        user
    }

    /// Insert a lead whose last activity is `age_minutes` in the past
    pub fn add_lead(
        &self,
        company: &str,
        assigned_to: Option<Uuid>,
        status: LeadStatus,
        value: f64,
        age_minutes: i64,
    ) -> Lead {
        let at = Utc::now() - Duration::minutes(age_minutes);
        let lead = CreateLead {
            company: company.to_string(),
            contact: "Contact".into(),
            status: Some(status),
            value: Some(value),
            ..Default::default()
        }
        .into_lead(assigned_to, at)
        .unwrap();
        self.leads.leads.lock().unwrap().push(lead.clone());
        lead
    }

    pub fn services(&self) -> Services {
        Services::from_uow(Arc::new(self.clone()), Config::default())
    }

    pub fn router(&self) -> Router {
        create_router(AppState::new(Arc::new(self.services())))
    }
}

pub fn identity(user: &User) -> Identity {
    Identity::new(user.id, user.role)
}

// =============================================================================
// HTTP helpers
// =============================================================================

/// A bearer token signed with the development secret used by `Config::default()`
pub fn token_for(user: &User) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(lead_crm::config::DEV_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Send a request and return the status with the parsed JSON body
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
