use crate::store::Record;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::{Dummy, Faker};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Closed set of labelled options for a choice field.
///
pub trait Choice: Copy + PartialEq + 'static {
    fn all() -> &'static [Self];
    fn label(&self) -> &'static str;

    /// Find the option whose label matches, ignoring case.
    ///
    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::all()
            .iter()
            .copied()
            .find(|option| option.label().eq_ignore_ascii_case(label))
    }

    /// Return the labels of every option in declaration order.
    ///
    fn labels() -> Vec<&'static str> {
        Self::all().iter().map(|option| option.label()).collect()
    }
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl Choice for $name {
            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::all()[0]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Dummy<Faker> for $name {
            fn dummy_with_rng<R: Rng + ?Sized>(_: &Faker, rng: &mut R) -> Self {
                let all = Self::all();
                all[rng.gen_range(0..all.len())]
            }
        }
    };
}

choice_enum!(
    /// Campaign lifecycle.
    CampaignStatus {
        Draft => "Draft",
        Active => "Active",
        Paused => "Paused",
        Completed => "Completed",
    }
);

choice_enum!(
    /// Kind of marketing asset attached to a campaign.
    AssetKind {
        Email => "Email",
        LandingPage => "Landing page",
        BlogPost => "Blog post",
        SocialPost => "Social post",
        Ad => "Ad",
    }
);

choice_enum!(
    /// Email lifecycle.
    EmailStatus {
        Draft => "Draft",
        Scheduled => "Scheduled",
        Sent => "Sent",
        Archived => "Archived",
    }
);

choice_enum!(
    LifecycleStage {
        Subscriber => "Subscriber",
        Lead => "Lead",
        MarketingQualifiedLead => "Marketing qualified lead",
        SalesQualifiedLead => "Sales qualified lead",
        Opportunity => "Opportunity",
        Customer => "Customer",
        Evangelist => "Evangelist",
    }
);

choice_enum!(
    LeadStatus {
        New => "New",
        Open => "Open",
        InProgress => "In progress",
        OpenDeal => "Open deal",
        Unqualified => "Unqualified",
        AttemptedToContact => "Attempted to contact",
        Connected => "Connected",
        BadTiming => "Bad timing",
    }
);

choice_enum!(
    /// Sales pipeline stage of a deal.
    DealStage {
        AppointmentScheduled => "Appointment scheduled",
        QualifiedToBuy => "Qualified to buy",
        PresentationScheduled => "Presentation scheduled",
        DecisionMakerBoughtIn => "Decision maker bought-in",
        ContractSent => "Contract sent",
        ClosedWon => "Closed won",
        ClosedLost => "Closed lost",
    }
);

choice_enum!(
    TaskType {
        Todo => "To-do",
        Call => "Call",
        Email => "Email",
    }
);

choice_enum!(
    TaskStatus {
        NotStarted => "Not started",
        InProgress => "In progress",
        Waiting => "Waiting",
        Completed => "Completed",
    }
);

choice_enum!(
    Priority {
        None => "None",
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
);

choice_enum!(
    /// Static lists hold a fixed membership, active lists are rule based.
    ListKind {
        Static => "Static",
        Active => "Active",
    }
);

choice_enum!(
    ListObjectType {
        Contacts => "Contacts",
        Companies => "Companies",
    }
);

/// Defines a marketing asset attached to a campaign.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub kind: AssetKind,
}

/// Defines a planned budget line of a campaign.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub amount: f64,
}

/// Defines campaign data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: CampaignStatus,
    pub budget: f64,
    pub spend: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub budget_items: Vec<BudgetItem>,
    pub created_at: String,
    pub updated_at: String,
}

impl Campaign {
    /// Sum of all planned budget items.
    ///
    pub fn planned_total(&self) -> f64 {
        self.budget_items.iter().map(|item| item.amount).sum()
    }

    /// Budget left after spend, negative when overspent.
    ///
    pub fn remaining_budget(&self) -> f64 {
        self.budget - self.spend
    }
}

/// Delivery and engagement counters of an email.
///
#[derive(Clone, Copy, Debug, Default, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMetrics {
    pub sent: u32,
    pub delivered: u32,
    pub opened: u32,
    pub clicked: u32,
}

/// A typed element of an email body.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { content: String },
    Button { label: String, url: String },
    Image { src: String, alt: String },
    Divider,
    Spacer { height: u16 },
}

impl ContentBlock {
    /// Short name of the block type.
    ///
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::Button { .. } => "button",
            ContentBlock::Image { .. } => "image",
            ContentBlock::Divider => "divider",
            ContentBlock::Spacer { .. } => "spacer",
        }
    }

    /// One-line preview of the block for display.
    ///
    pub fn summary(&self) -> String {
        match self {
            ContentBlock::Text { content } => content.lines().next().unwrap_or("").to_string(),
            ContentBlock::Button { label, url } => format!("[{}] -> {}", label, url),
            ContentBlock::Image { src, alt } => format!("{} ({})", alt, src),
            ContentBlock::Divider => "----".to_string(),
            ContentBlock::Spacer { height } => format!("{}px", height),
        }
    }
}

impl Dummy<Faker> for ContentBlock {
    fn dummy_with_rng<R: Rng + ?Sized>(config: &Faker, rng: &mut R) -> Self {
        match rng.gen_range(0..5) {
            0 => ContentBlock::Text {
                content: String::dummy_with_rng(config, rng),
            },
            1 => ContentBlock::Button {
                label: String::dummy_with_rng(config, rng),
                url: String::dummy_with_rng(config, rng),
            },
            2 => ContentBlock::Image {
                src: String::dummy_with_rng(config, rng),
                alt: String::dummy_with_rng(config, rng),
            },
            3 => ContentBlock::Divider,
            _ => ContentBlock::Spacer {
                height: rng.gen_range(8..64),
            },
        }
    }
}

/// Defines email data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    pub status: EmailStatus,
    #[serde(default)]
    pub metrics: EmailMetrics,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub sent_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Email {
    /// Opened over delivered, zero when nothing was delivered.
    ///
    pub fn open_rate(&self) -> f64 {
        ratio(self.metrics.opened.into(), self.metrics.delivered.into())
    }

    /// Clicked over delivered, zero when nothing was delivered.
    ///
    pub fn click_rate(&self) -> f64 {
        ratio(self.metrics.clicked.into(), self.metrics.delivered.into())
    }
}

/// Divide two counters, returning zero for an empty denominator.
///
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Defines contact data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    #[dummy(faker = "FirstName()")]
    pub first_name: String,
    #[dummy(faker = "LastName()")]
    pub last_name: String,
    #[dummy(faker = "SafeEmail()")]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub owner: String,
    pub lifecycle_stage: LifecycleStage,
    pub lead_status: LeadStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Contact {
    /// First and last name joined, falling back to the email address.
    ///
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// Defines company data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub owner: String,
    pub lifecycle_stage: LifecycleStage,
    pub created_at: String,
    pub updated_at: String,
}

/// Defines deal data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub name: String,
    pub stage: DealStage,
    pub amount: f64,
    pub close_date: Option<String>,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub company_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Deal {
    /// Whether the deal is still in the pipeline.
    ///
    pub fn is_open(&self) -> bool {
        !matches!(self.stage, DealStage::ClosedWon | DealStage::ClosedLost)
    }
}

/// Defines task data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub due_time: Option<String>,
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    /// Whether the task is unfinished and due before the given date.
    ///
    pub fn is_overdue(&self, today: &str) -> bool {
        self.status != TaskStatus::Completed
            && self
                .due_date
                .as_deref()
                .map(|due| !due.is_empty() && due < today)
                .unwrap_or(false)
    }
}

/// Defines list data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct CrmList {
    pub id: String,
    pub name: String,
    pub kind: ListKind,
    pub object_type: ListObjectType,
    #[serde(default)]
    pub member_ids: Vec<String>,
    #[serde(default)]
    pub owner: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Defines playbook data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct Playbook {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Defines email template data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Defines a campaign timeline entry.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub campaign_id: String,
    pub actor: String,
    pub action: ActivityAction,
    pub entity: String,
    pub timestamp: String,
}

choice_enum!(
    ActivityAction {
        Created => "created",
        Updated => "updated",
        Deleted => "deleted",
        AssetAdded => "added asset",
        BudgetItemAdded => "added budget item",
        TaskCreated => "created task",
    }
);

macro_rules! impl_record {
    ($($ty:ty => $kind:expr),+ $(,)?) => {
        $(
            impl Record for $ty {
                const KIND: &'static str = $kind;

                fn id(&self) -> &str {
                    &self.id
                }

                fn touch(&mut self, now: &str) {
                    self.updated_at = now.to_string();
                }
            }
        )+
    };
}

impl_record!(
    Campaign => "campaign",
    Email => "email",
    Contact => "contact",
    Company => "company",
    Deal => "deal",
    Task => "task",
    CrmList => "list",
    Playbook => "playbook",
    Template => "template",
);

#[cfg(test)]
mod tests {
    use super::*;
    use fake::Fake;

    #[test]
    fn choice_from_label_ignores_case_and_whitespace() {
        assert_eq!(
            EmailStatus::from_label(" scheduled "),
            Some(EmailStatus::Scheduled)
        );
        assert_eq!(DealStage::from_label("closed WON"), Some(DealStage::ClosedWon));
        assert_eq!(EmailStatus::from_label("bounced"), None);
    }

    #[test]
    fn choice_default_is_first_option() {
        assert_eq!(EmailStatus::default(), EmailStatus::Draft);
        assert_eq!(TaskStatus::default(), TaskStatus::NotStarted);
        assert_eq!(Priority::labels(), vec!["None", "Low", "Medium", "High"]);
    }

    #[test]
    fn email_status_serializes_lowercase() {
        let json = serde_json::to_string(&EmailStatus::Archived).unwrap();
        assert_eq!(json, "\"archived\"");
    }

    #[test]
    fn content_block_is_tagged_by_type() {
        let block = ContentBlock::Button {
            label: "Buy".to_string(),
            url: "https://example.com".to_string(),
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "button");
        assert_eq!(value["label"], "Buy");
        let divider: ContentBlock = serde_json::from_str(r#"{"type":"divider"}"#).unwrap();
        assert_eq!(divider, ContentBlock::Divider);
    }

    #[test]
    fn email_rates() {
        let mut email: Email = Faker.fake();
        email.metrics = EmailMetrics {
            sent: 120,
            delivered: 100,
            opened: 40,
            clicked: 10,
        };
        assert!((email.open_rate() - 0.4).abs() < f64::EPSILON);
        assert!((email.click_rate() - 0.1).abs() < f64::EPSILON);

        email.metrics = EmailMetrics::default();
        assert_eq!(email.open_rate(), 0.0);
        assert_eq!(email.click_rate(), 0.0);
    }

    #[test]
    fn campaign_budget_helpers() {
        let mut campaign: Campaign = Faker.fake();
        campaign.budget = 1000.0;
        campaign.spend = 250.0;
        campaign.budget_items = vec![
            BudgetItem {
                id: "1".to_string(),
                name: "Ads".to_string(),
                category: "Paid".to_string(),
                amount: 300.0,
            },
            BudgetItem {
                id: "2".to_string(),
                name: "Swag".to_string(),
                category: "Events".to_string(),
                amount: 200.0,
            },
        ];
        assert_eq!(campaign.planned_total(), 500.0);
        assert_eq!(campaign.remaining_budget(), 750.0);
    }

    #[test]
    fn contact_full_name_falls_back_to_email() {
        let mut contact: Contact = Faker.fake();
        contact.first_name = "Ada".to_string();
        contact.last_name = "Lovelace".to_string();
        assert_eq!(contact.full_name(), "Ada Lovelace");

        contact.first_name.clear();
        contact.last_name.clear();
        contact.email = "ada@example.com".to_string();
        assert_eq!(contact.full_name(), "ada@example.com");
    }

    #[test]
    fn task_overdue() {
        let mut task: Task = Faker.fake();
        task.status = TaskStatus::NotStarted;
        task.due_date = Some("2024-01-01".to_string());
        assert!(task.is_overdue("2024-01-02"));
        assert!(!task.is_overdue("2024-01-01"));

        task.status = TaskStatus::Completed;
        assert!(!task.is_overdue("2024-01-02"));

        task.status = TaskStatus::InProgress;
        task.due_date = None;
        assert!(!task.is_overdue("2024-01-02"));
    }

    #[test]
    fn deal_is_open() {
        let mut deal: Deal = Faker.fake();
        deal.stage = DealStage::ContractSent;
        assert!(deal.is_open());
        deal.stage = DealStage::ClosedLost;
        assert!(!deal.is_open());
    }

    #[test]
    fn record_touch_stamps_updated_at() {
        let mut template: Template = Faker.fake();
        template.touch("2025-01-01T00:00:00.000Z");
        assert_eq!(template.updated_at, "2025-01-01T00:00:00.000Z");
        assert_eq!(Template::KIND, "template");
        assert_eq!(template.id(), template.id.as_str());
    }
}
