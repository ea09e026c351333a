use chrono::{DateTime, Utc};
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

/// A single funding or withdrawal attempt against a savings plan.
///
/// Created `Pending` on each attempt; settled to `Completed` or `Failed` by
/// the payment confirmation callback. A completed transaction is immutable.
/// Amounts satisfy `net = gross - charge - penalty`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsTransactionModel {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub person_id: Uuid,
    #[serde(serialize_with = "serialize_transaction_type", deserialize_with = "deserialize_transaction_type")]
    pub transaction_type: TransactionType,
    pub gross_amount: Decimal,
    pub charge_amount: Decimal,
    pub penalty_amount: Decimal,
    pub net_amount: Decimal,
    pub early_withdrawal: bool,
    pub payment_reference: Option<HeaplessString<100>>,
    #[serde(serialize_with = "serialize_transaction_status", deserialize_with = "deserialize_transaction_status")]
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Hash from the previous audit record for chain verification (0 for initial create)
    pub antecedent_hash: i64,

    /// Reference to the previous audit log entry (Uuid::nil() for initial create)
    pub antecedent_audit_log_id: Uuid,

    /// Hash of the entity with hash field set to 0
    pub hash: i64,

    /// Reference to the current audit log entry for this entity
    pub audit_log_id: Option<Uuid>,
}

impl SavingsTransactionModel {
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    /// Settle a pending transaction as completed, stamping the settlement time.
    pub fn complete(&mut self, now: DateTime<Utc>) -> LedgerResult<()> {
        if !self.is_pending() {
            return Err(LedgerError::TransactionNotPending(
                self.status.as_str().to_string(),
            ));
        }
        self.status = TransactionStatus::Completed;
        self.completed_at = Some(now);
        Ok(())
    }

    /// Settle a pending transaction as failed.
    pub fn fail(&mut self) -> LedgerResult<()> {
        if !self.is_pending() {
            return Err(LedgerError::TransactionNotPending(
                self.status.as_str().to_string(),
            ));
        }
        self.status = TransactionStatus::Failed;
        Ok(())
    }
}

impl Identifiable for SavingsTransactionModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for SavingsTransactionModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

/// Index model for SavingsTransaction entity
/// Supports cached lookups by plan, by person and by hashed payment reference
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavingsTransactionIdxModel {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub person_id: Uuid,
    pub payment_reference_hash: Option<i64>,
}

impl HasPrimaryKey for SavingsTransactionIdxModel {
    fn primary_key(&self) -> Uuid {
        self.id
    }
}

impl IndexAware for SavingsTransactionModel {
    type IndexType = SavingsTransactionIdxModel;

    fn to_index(&self) -> Self::IndexType {
        let payment_reference_hash = self
            .payment_reference
            .as_ref()
            .map(|reference| hash_payment_reference(reference.as_str()));

        SavingsTransactionIdxModel {
            id: self.id,
            plan_id: self.plan_id,
            person_id: self.person_id,
            payment_reference_hash,
        }
    }
}

/// Stable hash for payment reference lookups in the index table and cache.
pub fn hash_payment_reference(reference: &str) -> i64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    reference.hash(&mut hasher);
    hasher.finish() as i64
}

impl Identifiable for SavingsTransactionIdxModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Index for SavingsTransactionIdxModel {}

impl Indexable for SavingsTransactionIdxModel {
    fn i64_keys(&self) -> HashMap<String, Option<i64>> {
        let mut keys = HashMap::new();
        keys.insert(
            "payment_reference_hash".to_string(),
            self.payment_reference_hash,
        );
        keys
    }

    fn uuid_keys(&self) -> HashMap<String, Option<Uuid>> {
        let mut keys = HashMap::new();
        keys.insert("plan_id".to_string(), Some(self.plan_id));
        keys.insert("person_id".to_string(), Some(self.person_id));
        keys
    }
}

pub type SavingsTransactionIdxModelCache = IdxModelCache<SavingsTransactionIdxModel>;

/// The direction of a savings transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
        }
    }
}

/// Settlement status of a savings transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
        }
    }
}

pub fn serialize_transaction_type<S>(
    transaction_type: &TransactionType,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(transaction_type.as_str())
}

pub fn deserialize_transaction_type<'de, D>(deserializer: D) -> Result<TransactionType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.as_str() {
        "DEPOSIT" => Ok(TransactionType::Deposit),
        "WITHDRAWAL" => Ok(TransactionType::Withdrawal),
        _ => Err(serde::de::Error::custom(format!("Unknown transaction type: {s}"))),
    }
}

pub fn serialize_transaction_status<S>(
    status: &TransactionStatus,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(status.as_str())
}

pub fn deserialize_transaction_status<'de, D>(
    deserializer: D,
) -> Result<TransactionStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.as_str() {
        "PENDING" => Ok(TransactionStatus::Pending),
        "COMPLETED" => Ok(TransactionStatus::Completed),
        "FAILED" => Ok(TransactionStatus::Failed),
        _ => Err(serde::de::Error::custom(format!("Unknown transaction status: {s}"))),
    }
}
