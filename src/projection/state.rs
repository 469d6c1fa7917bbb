//! User-base state carried from one projection month to the next

use crate::error::ModelError;
use crate::inputs::ModelInputs;

/// State of the user base at a point in time during projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBase {
    /// Current projection month (1-indexed, 0 before the first advance)
    pub projection_month: u32,

    /// Users after this month's growth and churn
    pub current_users: u64,

    /// Users acquired this month
    pub new_users: u64,

    /// Users lost this month
    pub churned_users: u64,
}

impl UserBase {
    /// Initialize state at projection start
    pub fn from_inputs(inputs: &ModelInputs) -> Self {
        Self {
            projection_month: 0,
            current_users: inputs.initial_users.max(0) as u64,
            new_users: 0,
            churned_users: 0,
        }
    }

    /// Advance to next month and apply growth and churn.
    ///
    /// Month 1 keeps the starting base as-is. Afterwards both flows are
    /// derived from the prior month's base and truncated toward zero.
    pub fn advance_month(&mut self, inputs: &ModelInputs) -> Result<(), ModelError> {
        self.projection_month += 1;

        if self.projection_month == 1 {
            self.new_users = 0;
            self.churned_users = 0;
            return Ok(());
        }

        let base = self.current_users as f64;
        let new_users = truncate_users(base * (inputs.monthly_growth_rate / 100.0), self.projection_month)?;
        let churned_users = truncate_users(base * (inputs.churn_rate / 100.0), self.projection_month)?;

        self.current_users = self
            .current_users
            .checked_add(new_users)
            .and_then(|users| users.checked_sub(churned_users))
            .ok_or_else(|| ModelError::computation(self.projection_month, "user count overflow"))?;
        self.new_users = new_users;
        self.churned_users = churned_users;

        Ok(())
    }

    /// Users active this month (the post-update base)
    pub fn active_users(&self) -> u64 {
        self.current_users
    }
}

/// Truncate a fractional user count toward zero
pub(crate) fn truncate_users(value: f64, month: u32) -> Result<u64, ModelError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ModelError::computation(month, format!("invalid user count {}", value)));
    }
    if value >= u64::MAX as f64 {
        return Err(ModelError::computation(month, "user count overflow"));
    }
    Ok(value.trunc() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_month_has_no_flows() {
        let inputs = ModelInputs::default();
        let mut state = UserBase::from_inputs(&inputs);
        state.advance_month(&inputs).unwrap();

        assert_eq!(state.projection_month, 1);
        assert_eq!(state.active_users(), 1000);
        assert_eq!(state.new_users, 0);
        assert_eq!(state.churned_users, 0);
    }

    #[test]
    fn test_growth_and_churn_truncate() {
        let inputs = ModelInputs { initial_users: 10, ..Default::default() };
        let mut state = UserBase::from_inputs(&inputs);
        state.advance_month(&inputs).unwrap();
        state.advance_month(&inputs).unwrap();

        // 10 * 15% = 1.5 -> 1, 10 * 5% = 0.5 -> 0
        assert_eq!(state.new_users, 1);
        assert_eq!(state.churned_users, 0);
        assert_eq!(state.current_users, 11);
    }

    #[test]
    fn test_full_churn_empties_base() {
        let inputs = ModelInputs {
            monthly_growth_rate: 0.0,
            churn_rate: 100.0,
            ..Default::default()
        };
        let mut state = UserBase::from_inputs(&inputs);
        state.advance_month(&inputs).unwrap();
        state.advance_month(&inputs).unwrap();
        assert_eq!(state.current_users, 0);

        state.advance_month(&inputs).unwrap();
        assert_eq!(state.churned_users, 0);
        assert_eq!(state.current_users, 0);
    }

    #[test]
    fn test_truncate_users_rejects_overflow() {
        assert_eq!(truncate_users(149.999, 2).unwrap(), 149);
        assert!(truncate_users(f64::NAN, 2).is_err());
        assert!(truncate_users(1e20, 2).is_err());
    }
}
