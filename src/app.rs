use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};

use crate::achievements::{self, default_achievements, ACHIEVEMENTS_KEY};
use crate::collection::PersistedCollection;
use crate::error::AppError;
use crate::model::{Achievement, Plan, PlanChanges, PlanFlag, PlanInput, PlanQuery};
use crate::plans::{self, seed_plans, PLANS_KEY};
use crate::storage::KeyValueStore;

/// Owns the plan collection and the achievement snapshot for one session.
///
/// Every accepted plan mutation runs the full sequence before returning:
/// persist plans, derive achievements, persist achievements. The unlock event
/// of that derivation pass, if any, is handed back in the [`Outcome`].
pub struct App<S> {
    store: S,
    plans: PersistedCollection<Plan>,
    achievements: PersistedCollection<Achievement>,
}

#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub unlocked: Option<Achievement>,
}

impl<T> Outcome<T> {
    fn unchanged(value: T) -> Self {
        Self {
            value,
            unlocked: None,
        }
    }
}

impl<S: KeyValueStore> App<S> {
    pub async fn open(store: S) -> Result<Self, AppError> {
        Self::open_with_seed(store, seed_plans()).await
    }

    pub async fn open_with_seed(store: S, seed: Vec<Plan>) -> Result<Self, AppError> {
        let plans = PersistedCollection::load(&store, PLANS_KEY, seed).await?;
        let achievements =
            PersistedCollection::load(&store, ACHIEVEMENTS_KEY, default_achievements()).await?;
        Ok(Self {
            store,
            plans,
            achievements,
        })
    }

    /// Runs a derivation pass against the current plans and persists the
    /// resulting snapshot. Used once after opening to bring a restored
    /// snapshot in line with restored plans.
    pub async fn reconcile(&mut self) -> Result<Option<Achievement>, AppError> {
        let derivation = achievements::derive(self.plans.items(), self.achievements.items());
        self.achievements
            .replace(&self.store, derivation.achievements)
            .await?;
        if let Some(achievement) = &derivation.unlocked {
            tracing::info!(
                id = achievement.id,
                title = %achievement.title,
                "achievement unlocked"
            );
        }
        Ok(derivation.unlocked)
    }

    #[cfg(test)]
    pub fn plans(&self) -> &[Plan] {
        self.plans.items()
    }

    pub fn achievements(&self) -> &[Achievement] {
        self.achievements.items()
    }

    pub fn get_plan(&self, id: i64) -> Result<&Plan, AppError> {
        self.plans
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("plan id {id}")))
    }

    pub fn list_plans(&self, query: &PlanQuery) -> Vec<&Plan> {
        plans::filter_plans(self.plans.items(), query)
    }

    pub fn plans_in_month(&self, year: i32, month: u32) -> BTreeMap<NaiveDate, Vec<&Plan>> {
        plans::plans_in_month(self.plans.items(), year, month)
    }

    pub async fn add_plan(&mut self, input: PlanInput) -> Result<Outcome<Plan>, AppError> {
        plans::validate_input(&input)?;
        let plan = plans::new_plan(self.plans.items(), input, Utc::now().timestamp_millis())?;
        self.plans.create(&self.store, plan.clone()).await?;
        tracing::debug!(id = plan.id, order = plan.order, "plan created");
        let unlocked = self.reconcile().await?;
        Ok(Outcome {
            value: plan,
            unlocked,
        })
    }

    /// Returns `None` in `value` when no plan has `id`; nothing is written in
    /// that case.
    pub async fn update_plan(
        &mut self,
        id: i64,
        changes: PlanChanges,
    ) -> Result<Outcome<Option<Plan>>, AppError> {
        plans::validate_changes(&changes)?;
        let updated = self
            .plans
            .update(&self.store, id, |plan| plans::apply_changes(plan, changes))
            .await?;
        self.after_mutation(id, updated).await
    }

    pub async fn toggle_plan(&mut self, id: i64) -> Result<Outcome<Option<Plan>>, AppError> {
        let toggled = self
            .plans
            .toggle(&self.store, id, PlanFlag::Completed)
            .await?;
        self.after_mutation(id, toggled).await
    }

    pub async fn delete_plan(&mut self, id: i64) -> Result<Outcome<bool>, AppError> {
        if !self.plans.delete(&self.store, id).await? {
            return Ok(Outcome::unchanged(false));
        }
        tracing::debug!(id, "plan deleted");
        let unlocked = self.reconcile().await?;
        Ok(Outcome {
            value: true,
            unlocked,
        })
    }

    async fn after_mutation(
        &mut self,
        id: i64,
        changed: bool,
    ) -> Result<Outcome<Option<Plan>>, AppError> {
        if !changed {
            tracing::debug!(id, "no plan with id; nothing changed");
            return Ok(Outcome::unchanged(None));
        }
        let unlocked = self.reconcile().await?;
        Ok(Outcome {
            value: self.plans.get(id).cloned(),
            unlocked,
        })
    }
}
