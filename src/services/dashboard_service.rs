//! Dashboard aggregation.
//!
//! Every figure is computed fresh per request from the caller's dashboard
//! scope. Sub-queries run concurrently and without a transaction, so a
//! concurrent write can make one snapshot slightly inconsistent.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::container::parallel;
use super::lead_service::with_assignees;
use super::scope;
use crate::config::{
    MAX_TARGET_PERCENT, NEW_LEAD_WINDOW_DAYS, RECENT_LEADS_LIMIT, TEAM_STATS_CONCURRENCY,
};
use crate::domain::{Identity, LeadFilter, LeadResponse, LeadScope, LeadStatus, User, UserRole};
use crate::errors::AppResult;
use crate::infra::{LeadRepository, UnitOfWork};

/// Headline figures
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_leads: u64,
    /// Won leads as a percentage of all visible leads, capped at 100
    #[schema(example = 67)]
    pub monthly_target: u32,
    pub active_sales_members: u64,
    pub total_revenue: f64,
    /// Same as the won count
    pub conversions: u64,
    /// Leads created in the last 30 days
    pub new_leads: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeadDistribution {
    pub qualified: u64,
    pub proposal: u64,
    pub won: u64,
    pub total: u64,
}

/// Per-member performance row
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    /// Display label, e.g. "Sales Rep"
    #[schema(example = "Sales Rep")]
    pub role: String,
    /// Won share of the member's leads, 0 when they hold none
    pub performance: u32,
    pub deals: u64,
    pub revenue: f64,
    pub leads: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub lead_distribution: LeadDistribution,
    pub recent_leads: Vec<LeadResponse>,
    pub team_members: Vec<TeamMember>,
}

#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Compute the dashboard as seen by `identity`
    async fn dashboard(&self, identity: Identity) -> AppResult<Dashboard>;
}

/// `round(part / max(whole, 1) * 100)`, capped at 100
pub fn percentage(part: u64, whole: u64) -> u32 {
    let ratio = part as f64 / whole.max(1) as f64;
    ((ratio * 100.0).round() as u32).min(MAX_TARGET_PERCENT)
}

async fn member_stats(leads: Arc<dyn LeadRepository>, user: User) -> AppResult<TeamMember> {
    let owned = LeadFilter::scoped(LeadScope::AssignedTo(user.id));
    let won = owned.clone().with_status(LeadStatus::Won);

    let (lead_count, deals, revenue) = tokio::try_join!(
        leads.count(owned),
        leads.count(won.clone()),
        leads.sum_value(won),
    )?;

    Ok(TeamMember {
        id: user.id,
        name: user.name,
        role: user.role.display_label().to_string(),
        performance: if lead_count == 0 {
            0
        } else {
            percentage(deals, lead_count)
        },
        deals,
        revenue,
        leads: lead_count,
    })
}

pub struct DashboardAggregator<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DashboardAggregator<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> DashboardService for DashboardAggregator<U> {
    async fn dashboard(&self, identity: Identity) -> AppResult<Dashboard> {
        let users = self.uow.users();
        let leads = self.uow.leads();

        let lead_scope = scope::dashboard_lead_scope(&identity, users.as_ref()).await?;
        let visible = LeadFilter::scoped(lead_scope);
        let window_start = Utc::now() - Duration::days(NEW_LEAD_WINDOW_DAYS);

        let team = match identity.role {
            UserRole::SalesMember => Vec::new(),
            UserRole::SalesManager | UserRole::Admin => {
                users.list(scope::user_scope(&identity)).await?
            }
        };
        let active_sales_members = match identity.role {
            UserRole::SalesMember => 1,
            UserRole::SalesManager | UserRole::Admin => team.len() as u64,
        };

        let (total, qualified, proposal, won, new_leads, total_revenue, recent) = tokio::try_join!(
            leads.count(visible.clone()),
            leads.count(visible.clone().with_status(LeadStatus::Qualified)),
            leads.count(visible.clone().with_status(LeadStatus::Proposal)),
            leads.count(visible.clone().with_status(LeadStatus::Won)),
            leads.count(visible.clone().created_since(window_start)),
            leads.sum_value(visible.clone().with_status(LeadStatus::Won)),
            leads.find(visible.clone(), Some(RECENT_LEADS_LIMIT)),
        )?;

        let recent_leads = with_assignees(users.as_ref(), recent).await?;

        let team_members = parallel::join_all_limited(
            team.into_iter()
                .map(|user| member_stats(leads.clone(), user)),
            TEAM_STATS_CONCURRENCY,
        )
        .await?;

        tracing::debug!(
            user_id = %identity.user_id,
            role = %identity.role,
            total,
            "Dashboard computed"
        );

        Ok(Dashboard {
            stats: DashboardStats {
                total_leads: total,
                monthly_target: percentage(won, total),
                active_sales_members,
                total_revenue,
                conversions: won,
                new_leads,
            },
            lead_distribution: LeadDistribution {
                qualified,
                proposal,
                won,
                total,
            },
            recent_leads,
            team_members,
        })
    }
}
