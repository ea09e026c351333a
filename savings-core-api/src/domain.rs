use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Default early-withdrawal penalty rate, in percent.
pub fn default_penalty_rate() -> Decimal {
    Decimal::new(5, 0)
}

/// Default deposit charge rate, in percent.
pub fn default_charge_rate() -> Decimal {
    Decimal::new(2, 0)
}

fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("amount_not_positive"));
    }
    Ok(())
}

fn validate_rate(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("rate_out_of_range"));
    }
    Ok(())
}

/// Request to open a rent-savings plan.
///
/// Rates are percentages; omitted rates fall back to the platform defaults
/// (5% early-withdrawal penalty, 2% deposit charge). The due date must lie
/// strictly in the future, which is checked against the clock at the ledger
/// rather than here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlanCommand {
    pub owner_person_id: Uuid,

    #[validate(custom(function = validate_positive_amount))]
    pub target_amount: Decimal,

    pub due_date: NaiveDate,

    #[serde(default = "default_penalty_rate")]
    #[validate(custom(function = validate_rate))]
    pub penalty_rate: Decimal,

    #[serde(default = "default_charge_rate")]
    #[validate(custom(function = validate_rate))]
    pub charge_rate: Decimal,

    /// Listed property the plan saves toward, if any.
    pub property_id: Option<Uuid>,

    /// Plan targets a property not listed on the platform.
    #[serde(default)]
    pub external_property: bool,

    #[validate(length(max = 200))]
    pub external_property_details: Option<String>,
}

/// Request to fund a plan. The payment reference is the gateway token the
/// confirmation callback will later present.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DepositCommand {
    pub plan_id: Uuid,
    pub person_id: Uuid,

    #[validate(custom(function = validate_positive_amount))]
    pub amount: Decimal,

    #[validate(length(max = 100))]
    pub payment_reference: Option<String>,
}

/// Request to withdraw from a plan.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WithdrawCommand {
    pub plan_id: Uuid,
    pub person_id: Uuid,

    #[validate(custom(function = validate_positive_amount))]
    pub amount: Decimal,

    #[validate(length(max = 100))]
    pub payment_reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_plan_command_applies_default_rates() {
        let cmd: CreatePlanCommand = serde_json::from_str(
            r#"{
                "owner_person_id": "7d2f5f2e-96a1-4bfb-9f41-1f62bb62f2e3",
                "target_amount": "100000",
                "due_date": "2027-01-01"
            }"#,
        )
        .unwrap();

        assert_eq!(cmd.penalty_rate, Decimal::new(5, 0));
        assert_eq!(cmd.charge_rate, Decimal::new(2, 0));
        assert!(!cmd.external_property);
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn create_plan_command_rejects_non_positive_target() {
        let cmd: CreatePlanCommand = serde_json::from_str(
            r#"{
                "owner_person_id": "7d2f5f2e-96a1-4bfb-9f41-1f62bb62f2e3",
                "target_amount": "0",
                "due_date": "2027-01-01"
            }"#,
        )
        .unwrap();

        assert!(cmd.validate().is_err());
    }

    #[test]
    fn create_plan_command_rejects_rate_above_hundred() {
        let cmd: CreatePlanCommand = serde_json::from_str(
            r#"{
                "owner_person_id": "7d2f5f2e-96a1-4bfb-9f41-1f62bb62f2e3",
                "target_amount": "50000",
                "due_date": "2027-01-01",
                "penalty_rate": "101"
            }"#,
        )
        .unwrap();

        assert!(cmd.validate().is_err());
    }

    #[test]
    fn deposit_command_rejects_negative_amount() {
        let cmd: DepositCommand = serde_json::from_str(
            r#"{
                "plan_id": "7d2f5f2e-96a1-4bfb-9f41-1f62bb62f2e3",
                "person_id": "52ce7392-3a3e-4b6b-b38d-35f5a211bd7a",
                "amount": "-25"
            }"#,
        )
        .unwrap();

        assert!(cmd.validate().is_err());
    }
}
