use chrono::Utc;
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use savings_core_db::models::savings::savings_transaction::{
    SavingsTransactionModel, TransactionStatus, TransactionType,
};
use uuid::Uuid;

pub fn create_test_deposit_transaction(plan_id: Uuid, person_id: Uuid) -> SavingsTransactionModel {
    SavingsTransactionModel {
        id: Uuid::new_v4(),
        plan_id,
        person_id,
        transaction_type: TransactionType::Deposit,
        gross_amount: Decimal::new(10_000, 0),
        charge_amount: Decimal::new(200, 0),
        penalty_amount: Decimal::ZERO,
        net_amount: Decimal::new(9_800, 0),
        early_withdrawal: false,
        payment_reference: None,
        status: TransactionStatus::Pending,
        created_at: Utc::now(),
        completed_at: None,
        antecedent_hash: 0,
        antecedent_audit_log_id: Uuid::nil(),
        hash: 0,
        audit_log_id: None,
    }
}

pub fn create_test_deposit_transaction_with_reference(
    plan_id: Uuid,
    person_id: Uuid,
    reference: &str,
) -> SavingsTransactionModel {
    let mut transaction = create_test_deposit_transaction(plan_id, person_id);
    transaction.payment_reference = Some(HeaplessString::try_from(reference).unwrap());
    transaction
}
