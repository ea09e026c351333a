use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use savings_core_db::models::savings::savings_plan::{PlanStatus, SavingsPlanModel};
use uuid::Uuid;

pub fn create_test_savings_plan(owner_person_id: Uuid, property_id: Option<Uuid>) -> SavingsPlanModel {
    SavingsPlanModel {
        id: Uuid::new_v4(),
        owner_person_id,
        property_id,
        external_property: false,
        external_property_details: None,
        target_amount: Decimal::new(100_000, 0),
        current_amount: Decimal::ZERO,
        due_date: (Utc::now() + Duration::days(180)).date_naive(),
        status: PlanStatus::Active,
        penalty_rate: Decimal::new(5, 0),
        charge_rate: Decimal::new(2, 0),
        created_at: Utc::now(),
        antecedent_hash: 0,
        antecedent_audit_log_id: Uuid::nil(),
        hash: 0,
        audit_log_id: None,
    }
}

pub fn create_test_savings_plan_due_in_days(owner_person_id: Uuid, days: i64) -> SavingsPlanModel {
    let mut plan = create_test_savings_plan(owner_person_id, None);
    plan.due_date = (Utc::now() + Duration::days(days)).date_naive();
    plan
}
