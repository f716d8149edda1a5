//! Seed command - Replaces all users and leads with the demo data set.

use chrono::Utc;
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{CreateLead, LeadPriority, LeadSource, LeadStatus, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::{LeadEntity, UserEntity};
use crate::infra::{Database, Persistence, UnitOfWork};

/// Shared password of every demo account
const DEMO_PASSWORD: &str = "password123";

/// (name, email, role) of each demo account
const DEMO_USERS: [(&str, &str, UserRole); 4] = [
    ("Admin User", "admin@company.com", UserRole::Admin),
    ("Sales Manager", "manager@company.com", UserRole::SalesManager),
    ("Alice Cole", "alice@company.com", UserRole::SalesMember),
    ("Bob Johnson", "bob@company.com", UserRole::SalesMember),
];

struct DemoLead {
    company: &'static str,
    contact: &'static str,
    email: &'static str,
    phone: &'static str,
    status: LeadStatus,
    value: f64,
    priority: LeadPriority,
    source: LeadSource,
    notes: &'static str,
}

impl DemoLead {
    fn into_request(self, assigned_to: Uuid) -> CreateLead {
        CreateLead {
            company: self.company.into(),
            contact: self.contact.into(),
            email: Some(self.email.into()),
            phone: Some(self.phone.into()),
            status: Some(self.status),
            value: Some(self.value),
            priority: Some(self.priority),
            source: Some(self.source),
            assigned_to: Some(assigned_to),
            notes: Some(self.notes.into()),
        }
    }
}

/// Demo leads: three for the first sales member, two for the second
fn demo_leads(first: Uuid, second: Uuid) -> Vec<CreateLead> {
    vec![
        DemoLead {
            company: "Tech Innovations Inc",
            contact: "John Smith",
            email: "john@techinnovations.com",
            phone: "+1-555-0123",
            status: LeadStatus::Qualified,
            value: 25000.0,
            priority: LeadPriority::High,
            source: LeadSource::Website,
            notes: "Interested in enterprise solution",
        }
        .into_request(first),
        DemoLead {
            company: "Global Solutions Ltd",
            contact: "Sarah Johnson",
            email: "sarah@globalsolutions.com",
            phone: "+1-555-0124",
            status: LeadStatus::Proposal,
            value: 45000.0,
            priority: LeadPriority::High,
            source: LeadSource::Referral,
            notes: "Proposal sent, waiting for response",
        }
        .into_request(first),
        DemoLead {
            company: "Startup Ventures",
            contact: "Mike Wilson",
            email: "mike@startupventures.com",
            phone: "+1-555-0125",
            status: LeadStatus::Won,
            value: 15000.0,
            priority: LeadPriority::Medium,
            source: LeadSource::SocialMedia,
            notes: "Deal closed successfully",
        }
        .into_request(second),
        DemoLead {
            company: "NextGen Software",
            contact: "Emily Davis",
            email: "emily@nextgen.com",
            phone: "+1-555-0126",
            status: LeadStatus::New,
            value: 30000.0,
            priority: LeadPriority::Medium,
            source: LeadSource::Event,
            notes: "Met at tech conference",
        }
        .into_request(second),
        DemoLead {
            company: "Digital Corp",
            contact: "David Brown",
            email: "david@digitalcorp.com",
            phone: "+1-555-0127",
            status: LeadStatus::Qualified,
            value: 20000.0,
            priority: LeadPriority::Low,
            source: LeadSource::ColdOutreach,
            notes: "Responded to cold email campaign",
        }
        .into_request(first),
    ]
}

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;

    let leads_removed = LeadEntity::delete_many().exec(db.connection()).await?;
    let users_removed = UserEntity::delete_many().exec(db.connection()).await?;
    tracing::info!(
        users = users_removed.rows_affected,
        leads = leads_removed.rows_affected,
        "Cleared existing data"
    );

    let uow = Persistence::new(db.connection().clone());

    let mut members = Vec::new();
    for (name, email, role) in DEMO_USERS {
        let hash = Password::new(DEMO_PASSWORD)?.into_string();
        let user = uow
            .users()
            .create(User::new(name.into(), email.into(), hash, role))
            .await?;
        if user.role == UserRole::SalesMember {
            members.push(user.id);
        }
    }
    tracing::info!(count = DEMO_USERS.len(), "Created users");

    let &[first, second] = members.as_slice() else {
        return Err(AppError::internal("demo data needs exactly two sales members"));
    };

    let now = Utc::now();
    let leads = demo_leads(first, second);
    let lead_count = leads.len();
    for request in leads {
        let owner = request.assigned_to;
        uow.leads().insert(request.into_lead(owner, now)?).await?;
    }
    tracing::info!(count = lead_count, "Created sample leads");

    println!("Database seeded. Login credentials (password: {}):", DEMO_PASSWORD);
    for (name, email, _) in DEMO_USERS {
        println!("  {}: {}", name, email);
    }

    Ok(())
}
