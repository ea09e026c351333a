use chrono::{DateTime, NaiveDate, Utc};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::models::index::Index;
use crate::models::index_aware::IndexAware;
use crate::{HasPrimaryKey, IdxModelCache, Indexable};
use savings_core_api::{LedgerError, LedgerResult};

/// Represents a tenant's rent-savings plan.
///
/// This entity is auditable and indexable - accessed by ID with comprehensive audit tracking.
/// A plan accumulates the net effect of completed deposit and withdrawal
/// transactions in `current_amount` and completes when the target is reached
/// or the due date passes. Rates are stored as percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsPlanModel {
    pub id: Uuid,
    pub owner_person_id: Uuid,
    pub property_id: Option<Uuid>,
    pub external_property: bool,
    pub external_property_details: Option<HeaplessString<200>>,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub due_date: NaiveDate,
    #[serde(serialize_with = "serialize_plan_status", deserialize_with = "deserialize_plan_status")]
    pub status: PlanStatus,
    pub penalty_rate: Decimal,
    pub charge_rate: Decimal,
    pub created_at: DateTime<Utc>,

    /// Hash from the previous audit record for chain verification (0 for initial create)
    pub antecedent_hash: i64,

    /// Reference to the previous audit log entry (Uuid::nil() for initial create)
    pub antecedent_audit_log_id: Uuid,

    /// Hash of the entity with hash field set to 0
    /// - 0: for new entities not yet created or not yet hashed
    /// - Non-zero: computed hash providing tamper detection
    pub hash: i64,

    /// Reference to the current audit log entry for this entity
    /// - None: for new entities not yet created
    /// - Some(uuid): updated on every create/update operation to reference the latest audit log
    ///
    /// This field, together with `id`, forms the composite primary key in the audit table
    pub audit_log_id: Option<Uuid>,
}

impl SavingsPlanModel {
    pub fn is_active(&self) -> bool {
        self.status == PlanStatus::Active
    }

    /// A plan is matured once its due date has been reached.
    pub fn is_matured(&self, today: NaiveDate) -> bool {
        today >= self.due_date
    }

    /// Apply the net effect of a confirmed deposit.
    ///
    /// Returns `true` when this deposit reached the target and completed the
    /// plan; the `Active -> Completed` transition happens at most once
    /// because a completed plan no longer accepts deposits.
    pub fn apply_deposit(&mut self, net_amount: Decimal) -> LedgerResult<bool> {
        if !self.is_active() {
            return Err(LedgerError::PlanNotActive(self.status.as_str().to_string()));
        }
        self.current_amount += net_amount;
        if self.current_amount >= self.target_amount {
            self.status = PlanStatus::Completed;
            return Ok(true);
        }
        Ok(false)
    }

    /// Apply the gross effect of a confirmed withdrawal.
    ///
    /// Withdrawing from a completed plan is the maturity payout path; only a
    /// cancelled plan refuses withdrawals. `current_amount` can never go
    /// negative: an over-withdrawal fails without touching the balance.
    pub fn apply_withdrawal(&mut self, gross_amount: Decimal) -> LedgerResult<()> {
        if self.status == PlanStatus::Cancelled {
            return Err(LedgerError::PlanNotActive(self.status.as_str().to_string()));
        }
        if gross_amount > self.current_amount {
            return Err(LedgerError::InsufficientFunds {
                requested: gross_amount,
                available: self.current_amount,
            });
        }
        self.current_amount -= gross_amount;
        Ok(())
    }

    pub fn cancel(&mut self) -> LedgerResult<()> {
        if !self.is_active() {
            return Err(LedgerError::PlanNotActive(self.status.as_str().to_string()));
        }
        self.status = PlanStatus::Cancelled;
        Ok(())
    }

    /// Transition an active plan to completed once the due date has passed.
    pub fn mature(&mut self, today: NaiveDate) -> LedgerResult<()> {
        if !self.is_active() {
            return Err(LedgerError::PlanNotActive(self.status.as_str().to_string()));
        }
        if !self.is_matured(today) {
            return Err(LedgerError::InvalidPlan(format!(
                "plan {} is not due before {}",
                self.id, self.due_date
            )));
        }
        self.status = PlanStatus::Completed;
        Ok(())
    }
}

impl Identifiable for SavingsPlanModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for SavingsPlanModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

/// Index model for SavingsPlan entity
/// Supports cached lookups by owner and by linked property
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavingsPlanIdxModel {
    pub id: Uuid,
    pub owner_person_id: Uuid,
    pub property_id: Option<Uuid>,
}

impl HasPrimaryKey for SavingsPlanIdxModel {
    fn primary_key(&self) -> Uuid {
        self.id
    }
}

impl IndexAware for SavingsPlanModel {
    type IndexType = SavingsPlanIdxModel;

    fn to_index(&self) -> Self::IndexType {
        SavingsPlanIdxModel {
            id: self.id,
            owner_person_id: self.owner_person_id,
            property_id: self.property_id,
        }
    }
}

impl Identifiable for SavingsPlanIdxModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Index for SavingsPlanIdxModel {}

impl Indexable for SavingsPlanIdxModel {
    fn i64_keys(&self) -> HashMap<String, Option<i64>> {
        HashMap::new()
    }

    fn uuid_keys(&self) -> HashMap<String, Option<Uuid>> {
        let mut keys = HashMap::new();
        keys.insert("owner_person_id".to_string(), Some(self.owner_person_id));
        keys.insert("property_id".to_string(), self.property_id);
        keys
    }
}

pub type SavingsPlanIdxModelCache = IdxModelCache<SavingsPlanIdxModel>;

/// Lifecycle status of a savings plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "plan_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Active,
    Completed,
    Cancelled,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Active => "ACTIVE",
            PlanStatus::Completed => "COMPLETED",
            PlanStatus::Cancelled => "CANCELLED",
        }
    }
}

pub fn serialize_plan_status<S>(status: &PlanStatus, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(status.as_str())
}

pub fn deserialize_plan_status<'de, D>(deserializer: D) -> Result<PlanStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.as_str() {
        "ACTIVE" => Ok(PlanStatus::Active),
        "COMPLETED" => Ok(PlanStatus::Completed),
        "CANCELLED" => Ok(PlanStatus::Cancelled),
        _ => Err(serde::de::Error::custom(format!("Unknown plan status: {s}"))),
    }
}
