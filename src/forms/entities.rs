//! Field layouts and record builders for each entity form.

use super::{FieldInput, Form, FormDefaults, FormError, FormField, FormKind, FormMode, FormValues};
use crate::crm::*;
use crate::store::{Patch, Record, Slice, StoreError};
use log::*;
use serde_json::Value;

/// Fields a form may never send in an edit patch.
const FIXED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// A record that can be created and edited through a form.
///
pub trait Editable: Record {
    /// Return the form fields, pre-filled from an existing record when
    /// editing.
    fn form_fields(existing: Option<&Self>, defaults: &FormDefaults) -> Vec<FormField>;

    /// Build a record from validated values. Fields the form does not cover
    /// are taken from `base` when editing.
    fn from_form(
        values: &FormValues,
        base: Option<&Self>,
        id: String,
        now: &str,
    ) -> Result<Self, FormError>;
}

fn owner_of(existing: Option<&str>, defaults: &FormDefaults) -> String {
    existing.unwrap_or(&defaults.owner).to_string()
}

fn created_at(base: Option<&str>, now: &str) -> String {
    base.unwrap_or(now).to_string()
}

/// Top-level fields whose values differ between two records, excluding
/// identity and audit fields.
///
pub fn diff_patch<T: Record>(before: &T, after: &T) -> Result<Patch, StoreError> {
    let serialize = |record: &T| {
        serde_json::to_value(record).map_err(|e| StoreError::SerializationFailed {
            key: T::KIND.to_string(),
            message: e.to_string(),
        })
    };
    let (before, after) = match (serialize(before)?, serialize(after)?) {
        (Value::Object(before), Value::Object(after)) => (before, after),
        _ => {
            return Err(StoreError::InvalidPatch {
                kind: T::KIND,
                message: "record is not an object".to_string(),
            })
        }
    };
    Ok(after
        .into_iter()
        .filter(|(field, value)| {
            !FIXED_FIELDS.contains(&field.as_str()) && before.get(field) != Some(value)
        })
        .collect())
}

/// Validate the form and dispatch the result to the slice: a new record on
/// create, a patch of the changed fields on edit. Returns the record id.
/// On error the slice is untouched.
///
pub fn apply_form<T: Editable>(slice: &mut Slice<T>, form: &Form) -> Result<String, FormError> {
    let values = form.validate()?;
    match form.mode() {
        FormMode::Create => {
            let id = generate_id();
            let record = T::from_form(&values, None, id.clone(), &timestamp())?;
            slice.add(record)?;
            info!("Created {} '{}'.", T::KIND, id);
            Ok(id)
        }
        FormMode::Edit { id } => {
            let existing = slice.get(id).cloned().ok_or_else(|| StoreError::NotFound {
                kind: T::KIND,
                id: id.clone(),
            })?;
            let edited = T::from_form(&values, Some(&existing), id.clone(), &timestamp())?;
            let patch = diff_patch(&existing, &edited)?;
            debug!("Editing {} '{}', changed fields: {:?}", T::KIND, id, patch.keys());
            slice.update(id, patch)?;
            Ok(id.clone())
        }
    }
}

/// Fields of the add-asset form.
///
pub fn asset_fields() -> Vec<FormField> {
    vec![
        FormField::text("name", "Name", "").required(),
        FormField::choice("kind", "Kind", AssetKind::default()),
    ]
}

pub fn asset_from_form(values: &FormValues) -> Asset {
    Asset {
        id: generate_id(),
        name: values.text("name"),
        kind: values.choice("kind"),
    }
}

/// Fields of the add-budget-item form.
///
pub fn budget_item_fields() -> Vec<FormField> {
    vec![
        FormField::text("name", "Name", "").required(),
        FormField::text("category", "Category", ""),
        FormField::number("amount", "Amount", 0.0).required(),
    ]
}

pub fn budget_item_from_form(values: &FormValues) -> BudgetItem {
    BudgetItem {
        id: generate_id(),
        name: values.text("name"),
        category: values.text("category"),
        amount: values.number("amount"),
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::SerializationFailed {
        key: Campaign::KIND.to_string(),
        message: e.to_string(),
    })
}

/// Validate an asset or budget item form and push the entry onto its
/// campaign. Returns the campaign id and the name of the added entry.
///
pub fn apply_nested_form(
    campaigns: &mut Slice<Campaign>,
    form: &Form,
) -> Result<(String, String), FormError> {
    let values = form.validate()?;
    let campaign_id = match form.kind() {
        FormKind::Asset { campaign_id } | FormKind::BudgetItem { campaign_id } => campaign_id,
        FormKind::Entity(_) => {
            return Err(FormError::Rejected(
                "Not an asset or budget item form".to_string(),
            ))
        }
    };
    let campaign = campaigns
        .get(campaign_id)
        .ok_or_else(|| StoreError::NotFound {
            kind: Campaign::KIND,
            id: campaign_id.clone(),
        })?;

    let mut patch = Patch::new();
    let name = match form.kind() {
        FormKind::Asset { .. } => {
            let asset = asset_from_form(&values);
            let name = asset.name.clone();
            let mut assets = campaign.assets.clone();
            assets.push(asset);
            patch.insert("assets".to_string(), to_value(&assets)?);
            name
        }
        _ => {
            let item = budget_item_from_form(&values);
            let name = item.name.clone();
            let mut items = campaign.budget_items.clone();
            items.push(item);
            patch.insert("budget_items".to_string(), to_value(&items)?);
            name
        }
    };
    campaigns.update(campaign_id, patch)?;
    Ok((campaign_id.clone(), name))
}

/// Fields of a new email pre-filled from a template: its name and subject,
/// and its body as the text content.
///
pub fn email_fields_from_template(template: &Template, defaults: &FormDefaults) -> Vec<FormField> {
    let now = timestamp();
    let seed = Email {
        id: String::new(),
        name: template.name.clone(),
        subject: template.subject.clone(),
        status: EmailStatus::Draft,
        metrics: EmailMetrics::default(),
        content: vec![ContentBlock::Text {
            content: template.body.clone(),
        }],
        campaign_id: None,
        scheduled_at: None,
        sent_at: None,
        created_at: now.clone(),
        updated_at: now,
    };
    Email::form_fields(Some(&seed), defaults)
}

impl Editable for Contact {
    fn form_fields(existing: Option<&Self>, defaults: &FormDefaults) -> Vec<FormField> {
        vec![
            FormField::text("first_name", "First name", existing.map(|c| c.first_name.as_str()).unwrap_or("")),
            FormField::text("last_name", "Last name", existing.map(|c| c.last_name.as_str()).unwrap_or("")),
            FormField::email("email", "Email", existing.map(|c| c.email.as_str()).unwrap_or("")).required(),
            FormField::text("phone", "Phone", existing.map(|c| c.phone.as_str()).unwrap_or("")),
            FormField::text("company", "Company", existing.map(|c| c.company.as_str()).unwrap_or("")),
            FormField::text(
                "owner",
                "Owner",
                &owner_of(existing.map(|c| c.owner.as_str()), defaults),
            ),
            FormField::choice(
                "lifecycle_stage",
                "Lifecycle stage",
                existing.map(|c| c.lifecycle_stage).unwrap_or_default(),
            ),
            FormField::choice(
                "lead_status",
                "Lead status",
                existing.map(|c| c.lead_status).unwrap_or_default(),
            ),
        ]
    }

    fn from_form(
        values: &FormValues,
        base: Option<&Self>,
        id: String,
        now: &str,
    ) -> Result<Self, FormError> {
        Ok(Contact {
            id,
            first_name: values.text("first_name"),
            last_name: values.text("last_name"),
            email: values.text("email"),
            phone: values.text("phone"),
            company: values.text("company"),
            owner: values.text("owner"),
            lifecycle_stage: values.choice("lifecycle_stage"),
            lead_status: values.choice("lead_status"),
            created_at: created_at(base.map(|c| c.created_at.as_str()), now),
            updated_at: now.to_string(),
        })
    }
}

impl Editable for Company {
    fn form_fields(existing: Option<&Self>, defaults: &FormDefaults) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", existing.map(|c| c.name.as_str()).unwrap_or("")).required(),
            FormField::text("domain", "Domain", existing.map(|c| c.domain.as_str()).unwrap_or("")),
            FormField::text("industry", "Industry", existing.map(|c| c.industry.as_str()).unwrap_or("")),
            FormField::text("city", "City", existing.map(|c| c.city.as_str()).unwrap_or("")),
            FormField::text("phone", "Phone", existing.map(|c| c.phone.as_str()).unwrap_or("")),
            FormField::text(
                "owner",
                "Owner",
                &owner_of(existing.map(|c| c.owner.as_str()), defaults),
            ),
            FormField::choice(
                "lifecycle_stage",
                "Lifecycle stage",
                existing.map(|c| c.lifecycle_stage).unwrap_or_default(),
            ),
        ]
    }

    fn from_form(
        values: &FormValues,
        base: Option<&Self>,
        id: String,
        now: &str,
    ) -> Result<Self, FormError> {
        Ok(Company {
            id,
            name: values.text("name"),
            domain: values.text("domain"),
            industry: values.text("industry"),
            city: values.text("city"),
            phone: values.text("phone"),
            owner: values.text("owner"),
            lifecycle_stage: values.choice("lifecycle_stage"),
            created_at: created_at(base.map(|c| c.created_at.as_str()), now),
            updated_at: now.to_string(),
        })
    }
}

impl Editable for Deal {
    fn form_fields(existing: Option<&Self>, defaults: &FormDefaults) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", existing.map(|d| d.name.as_str()).unwrap_or(""))
                .required(),
            FormField::choice("stage", "Stage", existing.map(|d| d.stage).unwrap_or_default()),
            FormField::number("amount", "Amount", existing.map(|d| d.amount).unwrap_or(0.0)),
            FormField::date(
                "close_date",
                "Close date",
                existing.and_then(|d| d.close_date.as_deref()),
            ),
            FormField::text(
                "owner",
                "Owner",
                &owner_of(existing.map(|d| d.owner.as_str()), defaults),
            ),
            FormField::text(
                "company_id",
                "Company id",
                existing.and_then(|d| d.company_id.as_deref()).unwrap_or(""),
            ),
        ]
    }

    fn from_form(
        values: &FormValues,
        base: Option<&Self>,
        id: String,
        now: &str,
    ) -> Result<Self, FormError> {
        Ok(Deal {
            id,
            name: values.text("name"),
            stage: values.choice("stage"),
            amount: values.number("amount"),
            close_date: values.optional("close_date"),
            owner: values.text("owner"),
            company_id: values.optional("company_id"),
            created_at: created_at(base.map(|d| d.created_at.as_str()), now),
            updated_at: now.to_string(),
        })
    }
}

impl Editable for Campaign {
    fn form_fields(existing: Option<&Self>, defaults: &FormDefaults) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", existing.map(|c| c.name.as_str()).unwrap_or(""))
                .required(),
            FormField::text(
                "owner",
                "Owner",
                &owner_of(existing.map(|c| c.owner.as_str()), defaults),
            ),
            FormField::choice("status", "Status", existing.map(|c| c.status).unwrap_or_default()),
            FormField::date(
                "start_date",
                "Start date",
                existing.and_then(|c| c.start_date.as_deref()),
            ),
            FormField::date(
                "end_date",
                "End date",
                existing.and_then(|c| c.end_date.as_deref()),
            ),
            FormField::number("budget", "Budget", existing.map(|c| c.budget).unwrap_or(0.0)),
            FormField::number("spend", "Spend", existing.map(|c| c.spend).unwrap_or(0.0)),
            FormField::multiline("notes", "Notes", existing.map(|c| c.notes.as_str()).unwrap_or("")),
        ]
    }

    fn from_form(
        values: &FormValues,
        base: Option<&Self>,
        id: String,
        now: &str,
    ) -> Result<Self, FormError> {
        let start_date = values.optional("start_date");
        let end_date = values.optional("end_date");
        if let (Some(start), Some(end)) = (&start_date, &end_date) {
            // Dates are validated as YYYY-MM-DD, so they order lexically.
            if end < start {
                return Err(FormError::DateRange {
                    start: start.clone(),
                    end: end.clone(),
                });
            }
        }
        Ok(Campaign {
            id,
            name: values.text("name"),
            owner: values.text("owner"),
            start_date,
            end_date,
            status: values.choice("status"),
            budget: values.number("budget"),
            spend: values.number("spend"),
            notes: values.multiline("notes"),
            assets: base.map(|c| c.assets.clone()).unwrap_or_default(),
            budget_items: base.map(|c| c.budget_items.clone()).unwrap_or_default(),
            created_at: created_at(base.map(|c| c.created_at.as_str()), now),
            updated_at: now.to_string(),
        })
    }
}

/// Text of the first text block, edited as the email body.
///
fn body_of(email: &Email) -> &str {
    email
        .content
        .iter()
        .find_map(|block| match block {
            ContentBlock::Text { content } => Some(content.as_str()),
            _ => None,
        })
        .unwrap_or("")
}

impl Editable for Email {
    fn form_fields(existing: Option<&Self>, _defaults: &FormDefaults) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", existing.map(|e| e.name.as_str()).unwrap_or(""))
                .required(),
            FormField::text(
                "subject",
                "Subject",
                existing.map(|e| e.subject.as_str()).unwrap_or(""),
            ),
            FormField::choice("status", "Status", existing.map(|e| e.status).unwrap_or_default()),
            FormField::text(
                "campaign_id",
                "Campaign id",
                existing.and_then(|e| e.campaign_id.as_deref()).unwrap_or(""),
            ),
            FormField::multiline("body", "Body", existing.map(body_of).unwrap_or("")),
        ]
    }

    fn from_form(
        values: &FormValues,
        base: Option<&Self>,
        id: String,
        now: &str,
    ) -> Result<Self, FormError> {
        let body = values.multiline("body");
        let mut blocks = base.map(|e| e.content.clone()).unwrap_or_default();
        let first_text = blocks
            .iter()
            .position(|block| matches!(block, ContentBlock::Text { .. }));
        match first_text {
            Some(index) => blocks[index] = ContentBlock::Text { content: body },
            None if !body.is_empty() => blocks.insert(0, ContentBlock::Text { content: body }),
            None => {}
        }
        Ok(Email {
            id,
            name: values.text("name"),
            subject: values.text("subject"),
            status: values.choice("status"),
            metrics: base.map(|e| e.metrics).unwrap_or_default(),
            content: blocks,
            campaign_id: values.optional("campaign_id"),
            scheduled_at: base.and_then(|e| e.scheduled_at.clone()),
            sent_at: base.and_then(|e| e.sent_at.clone()),
            created_at: created_at(base.map(|e| e.created_at.as_str()), now),
            updated_at: now.to_string(),
        })
    }
}

impl Editable for Task {
    fn form_fields(existing: Option<&Self>, _defaults: &FormDefaults) -> Vec<FormField> {
        vec![
            FormField::text("title", "Title", existing.map(|t| t.title.as_str()).unwrap_or(""))
                .required(),
            FormField::choice(
                "task_type",
                "Type",
                existing.map(|t| t.task_type).unwrap_or_default(),
            ),
            FormField::choice("status", "Status", existing.map(|t| t.status).unwrap_or_default()),
            FormField::choice(
                "priority",
                "Priority",
                existing.map(|t| t.priority).unwrap_or_default(),
            ),
            FormField::date("due_date", "Due date", existing.and_then(|t| t.due_date.as_deref())),
            FormField::time("due_time", "Due time", existing.and_then(|t| t.due_time.as_deref())),
            FormField::text(
                "campaign_id",
                "Campaign id",
                existing.and_then(|t| t.campaign_id.as_deref()).unwrap_or(""),
            ),
            FormField::multiline("notes", "Notes", existing.map(|t| t.notes.as_str()).unwrap_or("")),
        ]
    }

    fn from_form(
        values: &FormValues,
        base: Option<&Self>,
        id: String,
        now: &str,
    ) -> Result<Self, FormError> {
        Ok(Task {
            id,
            title: values.text("title"),
            task_type: values.choice("task_type"),
            status: values.choice("status"),
            priority: values.choice("priority"),
            due_date: values.optional("due_date"),
            due_time: values.optional("due_time"),
            campaign_id: values.optional("campaign_id"),
            notes: values.multiline("notes"),
            created_at: created_at(base.map(|t| t.created_at.as_str()), now),
            updated_at: now.to_string(),
        })
    }
}

impl Editable for CrmList {
    fn form_fields(existing: Option<&Self>, defaults: &FormDefaults) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", existing.map(|l| l.name.as_str()).unwrap_or(""))
                .required(),
            FormField::choice("kind", "Kind", existing.map(|l| l.kind).unwrap_or_default()),
            FormField::choice(
                "object_type",
                "Object type",
                existing.map(|l| l.object_type).unwrap_or_default(),
            ),
            FormField::text(
                "owner",
                "Owner",
                &owner_of(existing.map(|l| l.owner.as_str()), defaults),
            ),
        ]
    }

    fn from_form(
        values: &FormValues,
        base: Option<&Self>,
        id: String,
        now: &str,
    ) -> Result<Self, FormError> {
        Ok(CrmList {
            id,
            name: values.text("name"),
            kind: values.choice("kind"),
            object_type: values.choice("object_type"),
            member_ids: base.map(|l| l.member_ids.clone()).unwrap_or_default(),
            owner: values.text("owner"),
            created_at: created_at(base.map(|l| l.created_at.as_str()), now),
            updated_at: now.to_string(),
        })
    }
}

impl Editable for Playbook {
    fn form_fields(existing: Option<&Self>, defaults: &FormDefaults) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", existing.map(|p| p.name.as_str()).unwrap_or(""))
                .required(),
            FormField::text(
                "owner",
                "Owner",
                &owner_of(existing.map(|p| p.owner.as_str()), defaults),
            ),
            FormField::multiline(
                "description",
                "Description",
                existing.map(|p| p.description.as_str()).unwrap_or(""),
            ),
        ]
    }

    fn from_form(
        values: &FormValues,
        base: Option<&Self>,
        id: String,
        now: &str,
    ) -> Result<Self, FormError> {
        Ok(Playbook {
            id,
            name: values.text("name"),
            description: values.multiline("description"),
            owner: values.text("owner"),
            created_at: created_at(base.map(|p| p.created_at.as_str()), now),
            updated_at: now.to_string(),
        })
    }
}

impl Editable for Template {
    fn form_fields(existing: Option<&Self>, _defaults: &FormDefaults) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", existing.map(|t| t.name.as_str()).unwrap_or(""))
                .required(),
            FormField::text(
                "subject",
                "Subject",
                existing.map(|t| t.subject.as_str()).unwrap_or(""),
            ),
            FormField::text(
                "category",
                "Category",
                existing.map(|t| t.category.as_str()).unwrap_or(""),
            ),
            FormField::multiline("body", "Body", existing.map(|t| t.body.as_str()).unwrap_or("")),
        ]
    }

    fn from_form(
        values: &FormValues,
        base: Option<&Self>,
        id: String,
        now: &str,
    ) -> Result<Self, FormError> {
        Ok(Template {
            id,
            name: values.text("name"),
            subject: values.text("subject"),
            body: values.multiline("body"),
            category: values.text("category"),
            created_at: created_at(base.map(|t| t.created_at.as_str()), now),
            updated_at: now.to_string(),
        })
    }
}

/// Whether the field list edits a multiline value.
///
pub fn has_multiline(fields: &[FormField]) -> bool {
    fields.iter().any(|f| f.input == FieldInput::Multiline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    fn defaults() -> FormDefaults {
        FormDefaults {
            owner: "Jane Doe".to_string(),
        }
    }

    fn create_form<T: Editable>(collection: Collection) -> Form {
        Form::new(
            FormKind::Entity(collection),
            FormMode::Create,
            T::form_fields(None, &defaults()),
        )
    }

    #[test]
    fn create_campaign_adds_record_with_generated_id() {
        let mut slice: Slice<Campaign> = Slice::default();
        let mut form = create_form::<Campaign>(Collection::Campaigns);
        form.set_value("name", "Q4 Launch");

        let id = apply_form(&mut slice, &form).unwrap();
        let campaign = slice.get(&id).unwrap();
        assert_eq!(campaign.name, "Q4 Launch");
        assert_eq!(campaign.owner, "Jane Doe");
        assert_eq!(campaign.status, CampaignStatus::Draft);
        assert!(!id.is_empty());
        assert_eq!(campaign.created_at, campaign.updated_at);
    }

    #[test]
    fn missing_required_field_leaves_slice_untouched() {
        let mut slice: Slice<Contact> = Slice::default();
        let form = create_form::<Contact>(Collection::Contacts);
        assert_eq!(
            apply_form(&mut slice, &form).unwrap_err(),
            FormError::MissingField("Email".to_string())
        );
        assert!(slice.is_empty());
    }

    #[test]
    fn campaign_end_before_start_is_rejected() {
        let mut slice: Slice<Campaign> = Slice::default();
        let mut form = create_form::<Campaign>(Collection::Campaigns);
        form.set_value("name", "Spring")
            .set_value("start_date", "2025-04-01")
            .set_value("end_date", "2025-03-01");
        assert!(matches!(
            apply_form(&mut slice, &form),
            Err(FormError::DateRange { .. })
        ));
        assert!(slice.is_empty());
    }

    #[test]
    fn edit_dispatches_only_changed_fields() {
        let mut deal: Deal = Faker.fake();
        deal.id = "d1".to_string();
        deal.close_date = Some("2025-06-30".to_string());
        deal.company_id = Some("co1".to_string());
        deal.amount = 1200.0;
        deal.updated_at = "2020-01-01T00:00:00.000Z".to_string();
        let before = deal.clone();
        let mut slice = Slice::new(vec![deal]);

        let mut form = Form::new(
            FormKind::Entity(Collection::Deals),
            FormMode::Edit {
                id: "d1".to_string(),
            },
            Deal::form_fields(Some(&before), &defaults()),
        );
        form.set_value("name", "Renewal");

        let edited = Deal::from_form(&form.validate().unwrap(), Some(&before), "d1".to_string(), "now")
            .unwrap();
        let patch = diff_patch(&before, &edited).unwrap();
        assert_eq!(patch.keys().collect::<Vec<_>>(), vec!["name"]);

        apply_form(&mut slice, &form).unwrap();
        let after = slice.get("d1").unwrap();
        assert_eq!(after.name, "Renewal");
        assert_eq!(after.owner, before.owner);
        assert_eq!(after.created_at, before.created_at);
        assert_ne!(after.updated_at, before.updated_at);
    }

    #[test]
    fn edit_of_missing_record_is_rejected() {
        let mut slice: Slice<Playbook> = Slice::default();
        let mut form = Form::new(
            FormKind::Entity(Collection::Playbooks),
            FormMode::Edit {
                id: "gone".to_string(),
            },
            Playbook::form_fields(None, &defaults()),
        );
        form.set_value("name", "Onboarding");
        assert!(matches!(
            apply_form(&mut slice, &form),
            Err(FormError::Rejected(_))
        ));
    }

    #[test]
    fn nested_forms_push_onto_campaign() {
        let mut campaign: Campaign = Faker.fake();
        campaign.id = "c1".to_string();
        campaign.assets.clear();
        campaign.budget_items.clear();
        let mut slice = Slice::new(vec![campaign]);

        let mut form = Form::new(
            FormKind::Asset {
                campaign_id: "c1".to_string(),
            },
            FormMode::Create,
            asset_fields(),
        );
        form.set_value("name", "Launch post").set_value("kind", "Blog post");
        let (campaign_id, name) = apply_nested_form(&mut slice, &form).unwrap();
        assert_eq!(campaign_id, "c1");
        assert_eq!(name, "Launch post");

        let mut form = Form::new(
            FormKind::BudgetItem {
                campaign_id: "c1".to_string(),
            },
            FormMode::Create,
            budget_item_fields(),
        );
        form.set_value("name", "Ads").set_value("amount", "250");
        apply_nested_form(&mut slice, &form).unwrap();

        let campaign = slice.get("c1").unwrap();
        assert_eq!(campaign.assets.len(), 1);
        assert_eq!(campaign.assets[0].kind, AssetKind::BlogPost);
        assert_eq!(campaign.budget_items.len(), 1);
        assert_eq!(campaign.planned_total(), 250.0);
    }

    #[test]
    fn nested_form_for_unknown_campaign_fails() {
        let mut slice: Slice<Campaign> = Slice::default();
        let mut form = Form::new(
            FormKind::Asset {
                campaign_id: "nope".to_string(),
            },
            FormMode::Create,
            asset_fields(),
        );
        form.set_value("name", "Hero image");
        assert!(apply_nested_form(&mut slice, &form).is_err());
    }

    #[test]
    fn template_prefills_email_form() {
        let template = Template {
            id: "t1".to_string(),
            name: "Welcome".to_string(),
            subject: "Welcome aboard".to_string(),
            body: "Hi there".to_string(),
            category: "Onboarding".to_string(),
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
            updated_at: "2025-01-01T00:00:00.000Z".to_string(),
        };
        let fields = email_fields_from_template(&template, &defaults());
        assert!(has_multiline(&fields));
        let form = Form::new(FormKind::Entity(Collection::Emails), FormMode::Create, fields);
        assert_eq!(form.value("subject").as_deref(), Some("Welcome aboard"));
        assert_eq!(form.value("body").as_deref(), Some("Hi there"));

        let mut slice: Slice<Email> = Slice::default();
        let id = apply_form(&mut slice, &form).unwrap();
        let email = slice.get(&id).unwrap();
        assert_eq!(
            email.content,
            vec![ContentBlock::Text {
                content: "Hi there".to_string()
            }]
        );
        assert_eq!(email.status, EmailStatus::Draft);
    }

    #[test]
    fn email_edit_keeps_other_blocks() {
        let email = Email {
            id: "e1".to_string(),
            name: "Promo".to_string(),
            subject: "Sale".to_string(),
            status: EmailStatus::Draft,
            metrics: EmailMetrics::default(),
            content: vec![
                ContentBlock::Divider,
                ContentBlock::Text {
                    content: "Old".to_string(),
                },
            ],
            campaign_id: None,
            scheduled_at: None,
            sent_at: None,
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
            updated_at: "2025-01-01T00:00:00.000Z".to_string(),
        };
        let values = FormValues::new()
            .with("name", "Promo")
            .with("subject", "Sale")
            .with("status", "Draft")
            .with("body", "New\n");
        let edited = Email::from_form(&values, Some(&email), "e1".to_string(), "now").unwrap();
        assert_eq!(
            edited.content,
            vec![
                ContentBlock::Divider,
                ContentBlock::Text {
                    content: "New".to_string()
                }
            ]
        );
        assert_eq!(edited.created_at, email.created_at);
    }
}
