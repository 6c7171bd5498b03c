use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Contact, ContactNew, ContactUpdate, EngineError, ResultEngine, customers, suppliers};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

/// Generates the contact CRUD for one contact-shaped entity (customers or
/// suppliers). The two differ only in table and method names.
macro_rules! impl_contact_ops {
    ($module:ident, $label:literal, $new_fn:ident, $list_fn:ident, $get_fn:ident,
     $update_fn:ident, $delete_fn:ident) => {
        impl Engine {
            pub async fn $new_fn(
                &self,
                store_id: &str,
                user_id: &str,
                cmd: ContactNew,
            ) -> ResultEngine<Contact> {
                let name = normalize_required_name(&cmd.name, $label)?;
                with_tx!(self, |db_tx| {
                    self.require_store_member(&db_tx, store_id, user_id).await?;

                    let mut contact = Contact::new(store_id.to_string(), name);
                    contact.email = normalize_optional_text(cmd.email.as_deref());
                    contact.phone = normalize_optional_text(cmd.phone.as_deref());
                    contact.address = normalize_optional_text(cmd.address.as_deref());
                    contact.notes = normalize_optional_text(cmd.notes.as_deref());

                    let model = $module::ActiveModel::from(&contact).insert(&db_tx).await?;
                    Contact::try_from(model)
                })
            }

            pub async fn $list_fn(
                &self,
                store_id: &str,
                user_id: &str,
            ) -> ResultEngine<Vec<Contact>> {
                with_tx!(self, |db_tx| {
                    self.require_store_member(&db_tx, store_id, user_id).await?;

                    let models = $module::Entity::find()
                        .filter($module::Column::StoreId.eq(store_id.to_string()))
                        .order_by_asc($module::Column::Name)
                        .all(&db_tx)
                        .await?;
                    models.into_iter().map(Contact::try_from).collect()
                })
            }

            pub async fn $get_fn(
                &self,
                store_id: &str,
                contact_id: Uuid,
                user_id: &str,
            ) -> ResultEngine<Contact> {
                with_tx!(self, |db_tx| {
                    self.require_store_member(&db_tx, store_id, user_id).await?;

                    let model = $module::Entity::find_by_id(contact_id.to_string())
                        .filter($module::Column::StoreId.eq(store_id.to_string()))
                        .one(&db_tx)
                        .await?
                        .ok_or_else(|| {
                            EngineError::KeyNotFound(concat!($label, " not exists").to_string())
                        })?;
                    Contact::try_from(model)
                })
            }

            pub async fn $update_fn(
                &self,
                store_id: &str,
                contact_id: Uuid,
                user_id: &str,
                patch: ContactUpdate,
            ) -> ResultEngine<Contact> {
                with_tx!(self, |db_tx| {
                    self.require_store_member(&db_tx, store_id, user_id).await?;

                    let existing = $module::Entity::find_by_id(contact_id.to_string())
                        .filter($module::Column::StoreId.eq(store_id.to_string()))
                        .one(&db_tx)
                        .await?
                        .ok_or_else(|| {
                            EngineError::KeyNotFound(concat!($label, " not exists").to_string())
                        })?;

                    let name = match patch.name {
                        Some(name) => normalize_required_name(&name, $label)?,
                        None => existing.name.clone(),
                    };
                    let pick = |patch_field: Option<Option<String>>,
                                current: &Option<String>| {
                        match patch_field {
                            Some(value) => normalize_optional_text(value.as_deref()),
                            None => current.clone(),
                        }
                    };

                    let model = $module::ActiveModel {
                        id: ActiveValue::Set(contact_id.to_string()),
                        name: ActiveValue::Set(name),
                        email: ActiveValue::Set(pick(patch.email, &existing.email)),
                        phone: ActiveValue::Set(pick(patch.phone, &existing.phone)),
                        address: ActiveValue::Set(pick(patch.address, &existing.address)),
                        notes: ActiveValue::Set(pick(patch.notes, &existing.notes)),
                        updated_at: ActiveValue::Set(chrono::Utc::now()),
                        ..Default::default()
                    };
                    let updated = model.update(&db_tx).await?;
                    Contact::try_from(updated)
                })
            }

            /// Documents referencing the contact keep existing with the
            /// reference nulled out (handled by the schema's SET NULL).
            pub async fn $delete_fn(
                &self,
                store_id: &str,
                contact_id: Uuid,
                user_id: &str,
            ) -> ResultEngine<()> {
                with_tx!(self, |db_tx| {
                    self.require_store_member(&db_tx, store_id, user_id).await?;

                    let result = $module::Entity::delete_by_id(contact_id.to_string())
                        .filter($module::Column::StoreId.eq(store_id.to_string()))
                        .exec(&db_tx)
                        .await?;
                    if result.rows_affected == 0 {
                        return Err(EngineError::KeyNotFound(
                            concat!($label, " not exists").to_string(),
                        ));
                    }
                    Ok(())
                })
            }
        }
    };
}

impl_contact_ops!(
    customers,
    "customer",
    new_customer,
    customers,
    customer,
    update_customer,
    delete_customer
);

impl_contact_ops!(
    suppliers,
    "supplier",
    new_supplier,
    suppliers,
    supplier,
    update_supplier,
    delete_supplier
);
