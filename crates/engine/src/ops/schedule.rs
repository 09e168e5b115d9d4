use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use sea_orm::{QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    Category, EngineError, MoneyCents, ResultEngine, ScheduledObligation, scheduled_obligations,
};

use super::{Engine, normalize_optional_text, normalize_required_text};

/// Input for a newly scheduled obligation.
///
/// `amount` is a positive magnitude; settlement derives the sign from the
/// category.
#[derive(Clone, Copy, Debug)]
pub struct NewObligation<'a> {
    pub user_id: &'a str,
    pub title: &'a str,
    pub amount: MoneyCents,
    pub due_at: NaiveDate,
    pub category: &'a str,
    pub description: Option<&'a str>,
}

impl Engine {
    /// Schedules a future obligation.
    pub async fn schedule_obligation(&self, new: NewObligation<'_>) -> ResultEngine<Uuid> {
        let title = normalize_required_text(new.title, "title")?;
        let category = Category::try_from(new.category)?;
        let description = normalize_optional_text(new.description);
        let obligation = ScheduledObligation::new(
            new.user_id.to_string(),
            title,
            new.amount,
            new.due_at,
            category,
            description,
            Utc::now(),
        )?;

        self.ensure_account(new.user_id).await?;

        let id = obligation.id;
        scheduled_obligations::ActiveModel::from(&obligation)
            .insert(&self.database)
            .await?;
        Ok(id)
    }

    /// Unpaid obligations, soonest due first.
    pub async fn upcoming(&self, user_id: &str) -> ResultEngine<Vec<ScheduledObligation>> {
        let models = scheduled_obligations::Entity::find()
            .filter(scheduled_obligations::Column::UserId.eq(user_id))
            .filter(scheduled_obligations::Column::IsPaid.eq(false))
            .order_by_asc(scheduled_obligations::Column::DueAt)
            .all(&self.database)
            .await?;

        models
            .into_iter()
            .map(ScheduledObligation::try_from)
            .collect()
    }

    /// Unpaid obligations due on the given calendar day.
    pub async fn due_on(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> ResultEngine<Vec<ScheduledObligation>> {
        let models = scheduled_obligations::Entity::find()
            .filter(scheduled_obligations::Column::UserId.eq(user_id))
            .filter(scheduled_obligations::Column::IsPaid.eq(false))
            .filter(scheduled_obligations::Column::DueAt.eq(date))
            .order_by_asc(scheduled_obligations::Column::DueAt)
            .all(&self.database)
            .await?;

        models
            .into_iter()
            .map(ScheduledObligation::try_from)
            .collect()
    }

    /// Unpaid obligations due today.
    ///
    /// "Today" is resolved in the account's timezone (UTC when unset) and is
    /// recomputed on every call; the result feeds notification badges, so no
    /// staleness is tolerated here.
    pub async fn due_today(&self, user_id: &str) -> ResultEngine<Vec<ScheduledObligation>> {
        let today = self.local_today(user_id).await?;
        self.due_on(user_id, today).await
    }

    /// The current calendar day in the account's timezone (UTC fallback).
    pub async fn local_today(&self, user_id: &str) -> ResultEngine<NaiveDate> {
        let account = self.ensure_account(user_id).await?;
        let today = match account.timezone.as_deref().and_then(|z| z.parse::<Tz>().ok()) {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Utc::now().date_naive(),
        };
        Ok(today)
    }

    pub(super) async fn load_obligation(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> ResultEngine<ScheduledObligation> {
        let model = scheduled_obligations::Entity::find_by_id(id.to_string())
            .filter(scheduled_obligations::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("obligation not exists".to_string()))?;

        ScheduledObligation::try_from(model)
    }

    /// Conditional `false -> true` flip of the paid flag.
    ///
    /// The caller has already proven the id exists under its lock, so zero
    /// affected rows can only mean the flag was flipped elsewhere.
    pub(super) async fn mark_paid(&self, id: Uuid, paid_at: DateTime<Utc>) -> ResultEngine<()> {
        let result = scheduled_obligations::Entity::update_many()
            .col_expr(scheduled_obligations::Column::IsPaid, Expr::value(true))
            .col_expr(
                scheduled_obligations::Column::PaidAt,
                Expr::value(Some(paid_at)),
            )
            .filter(scheduled_obligations::Column::Id.eq(id.to_string()))
            .filter(scheduled_obligations::Column::IsPaid.eq(false))
            .exec(&self.database)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::AlreadyPaid(format!(
                "obligation {id} is already paid"
            )));
        }
        Ok(())
    }

    /// Conditional `true -> false` flip, used only by settlement rollback.
    /// Returns whether the flag was actually reverted.
    pub(super) async fn unmark_paid(&self, id: Uuid) -> ResultEngine<bool> {
        let result = scheduled_obligations::Entity::update_many()
            .col_expr(scheduled_obligations::Column::IsPaid, Expr::value(false))
            .col_expr(
                scheduled_obligations::Column::PaidAt,
                Expr::value(None::<DateTime<Utc>>),
            )
            .filter(scheduled_obligations::Column::Id.eq(id.to_string()))
            .filter(scheduled_obligations::Column::IsPaid.eq(true))
            .exec(&self.database)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
