//! Reference ingredients and their persistence.
//!
//! Prices are stored per one base unit of the entry's category, and
//! `dimension` always holds that base symbol. Writes go through [`NewEntry`],
//! which carries what the user actually paid; the bought quantity is first
//! expressed in the base unit with
//! [`normalize_to_base`](crate::conversion::normalize_to_base) and the price
//! of one base unit is derived with
//! [`unit_price_per_base`](crate::conversion::unit_price_per_base).

use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use serde::Serialize;

use crate::{
    Engine, EngineError, Money, ResultEngine, conversion, ingredients, units,
    util::{name_key, normalize_optional_text, normalize_required_name},
    with_tx,
};

/// A catalog row in domain form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub unit_symbol: String,
    /// Price of one `unit_symbol`.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

impl TryFrom<ingredients::Model> for CatalogEntry {
    type Error = EngineError;

    fn try_from(model: ingredients::Model) -> Result<Self, Self::Error> {
        let price = Decimal::from_str(model.price.trim()).map_err(|_| {
            EngineError::InvalidAmount(format!(
                "stored price \"{}\" of ingredient {} is not a decimal",
                model.price, model.id
            ))
        })?;
        Ok(Self {
            id: model.id,
            name: model.name,
            description: model.description,
            unit_symbol: model.dimension,
            price,
        })
    }
}

/// Input for creating or replacing a catalog entry.
///
/// `total_price` is what was paid for `quantity` of `unit`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEntry {
    pub name: String,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub total_price: Decimal,
    pub unit: String,
}

/// A validated row ready to be written.
struct PreparedEntry {
    name: String,
    name_norm: String,
    description: Option<String>,
    unit: String,
    price: Money,
}

impl NewEntry {
    fn prepare(&self) -> ResultEngine<PreparedEntry> {
        let name = normalize_required_name(&self.name, "ingredient")?;
        let unit = self.unit.trim();
        if units::category_of(unit).is_none() {
            return Err(EngineError::UnknownUnit(unit.to_string()));
        }
        if self.total_price <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount(format!(
                "price must be greater than 0, got {}",
                self.total_price
            )));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(EngineError::InvalidQuantity(format!(
                "quantity bought must be greater than 0, got {}",
                self.quantity
            )));
        }
        let (base, base_quantity) = conversion::normalize_to_base(unit, self.quantity)?;
        let (unit, price) =
            conversion::unit_price_per_base(self.total_price, base_quantity, base)?;

        Ok(PreparedEntry {
            name_norm: name_key(&name),
            name,
            description: normalize_optional_text(self.description.as_deref()),
            unit: unit.to_string(),
            price,
        })
    }
}

impl Engine {
    /// Every catalog entry, ordered by id.
    pub async fn entries(&self) -> ResultEngine<Vec<CatalogEntry>> {
        ingredients::Entity::find()
            .order_by_asc(ingredients::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(CatalogEntry::try_from)
            .collect()
    }

    /// A single catalog entry.
    pub async fn entry(&self, id: i32) -> ResultEngine<CatalogEntry> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("ingredient {id}")))?;
        CatalogEntry::try_from(model)
    }

    /// Adds an entry, storing the price of one base unit.
    pub async fn create_entry(&self, input: &NewEntry) -> ResultEngine<i32> {
        let prepared = input.prepare()?;
        with_tx!(self, |db_tx| {
            Self::ensure_unique_name(&db_tx, &prepared, None).await?;

            let active = ingredients::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(prepared.name.clone()),
                name_norm: ActiveValue::Set(prepared.name_norm.clone()),
                description: ActiveValue::Set(prepared.description.clone()),
                price: ActiveValue::Set(prepared.price.to_string()),
                dimension: ActiveValue::Set(prepared.unit.clone()),
            };
            let model = active.insert(&db_tx).await?;
            tracing::info!(
                id = model.id,
                name = %model.name,
                price = %model.price,
                unit = %model.dimension,
                "catalog entry created"
            );
            Ok(model.id)
        })
    }

    /// Replaces every field of an existing entry.
    pub async fn update_entry(&self, id: i32, input: &NewEntry) -> ResultEngine<()> {
        let prepared = input.prepare()?;
        with_tx!(self, |db_tx| {
            if ingredients::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .is_none()
            {
                return Err(EngineError::KeyNotFound(format!("ingredient {id}")));
            }
            Self::ensure_unique_name(&db_tx, &prepared, Some(id)).await?;

            let active = ingredients::ActiveModel {
                id: ActiveValue::Unchanged(id),
                name: ActiveValue::Set(prepared.name.clone()),
                name_norm: ActiveValue::Set(prepared.name_norm.clone()),
                description: ActiveValue::Set(prepared.description.clone()),
                price: ActiveValue::Set(prepared.price.to_string()),
                dimension: ActiveValue::Set(prepared.unit.clone()),
            };
            active.update(&db_tx).await?;
            tracing::info!(id, name = %prepared.name, "catalog entry updated");
            Ok(())
        })
    }

    /// Removes an entry.
    pub async fn delete_entry(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = ingredients::Entity::delete_by_id(id).exec(&db_tx).await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(format!("ingredient {id}")));
            }
            tracing::info!(id, "catalog entry deleted");
            Ok(())
        })
    }

    /// Cost of `quantity` of `unit` of the entry `id`.
    ///
    /// Same rules as [`conversion::price_for_quantity`]: an unknown `unit` is
    /// priced as if it were the entry's own unit.
    pub async fn quote(&self, id: i32, quantity: Decimal, unit: &str) -> ResultEngine<Money> {
        let entry = self.entry(id).await?;
        conversion::price_for_quantity(entry.price, quantity, unit, &entry.unit_symbol)
    }

    async fn ensure_unique_name<C: ConnectionTrait>(
        db: &C,
        prepared: &PreparedEntry,
        except_id: Option<i32>,
    ) -> ResultEngine<()> {
        let mut query = ingredients::Entity::find()
            .filter(ingredients::Column::NameNorm.eq(prepared.name_norm.clone()));
        if let Some(id) = except_id {
            query = query.filter(ingredients::Column::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(prepared.name.clone()));
        }
        Ok(())
    }
}
