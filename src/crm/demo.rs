//! Demo records used to seed an empty store.

use super::id::{generate_id, timestamp};
use super::resource::*;
use fake::faker::address::en::CityName;
use fake::faker::company::en::{CompanyName, Industry};
use fake::faker::phone_number::en::PhoneNumber;
use fake::{Fake, Faker};
use rand::Rng;

const CONTACT_COUNT: usize = 12;
const COMPANY_COUNT: usize = 6;
const DEAL_COUNT: usize = 8;

/// Houses one set of records per collection.
///
#[derive(Clone, Debug, Default)]
pub struct DemoData {
    pub contacts: Vec<Contact>,
    pub companies: Vec<Company>,
    pub deals: Vec<Deal>,
    pub campaigns: Vec<Campaign>,
    pub emails: Vec<Email>,
    pub tasks: Vec<Task>,
    pub lists: Vec<CrmList>,
    pub playbooks: Vec<Playbook>,
    pub templates: Vec<Template>,
}

impl DemoData {
    /// Generate a fresh demo data set owned by the given user.
    ///
    pub fn generate(owner: &str) -> DemoData {
        let now = timestamp();
        let mut rng = rand::thread_rng();

        let companies: Vec<Company> = (0..COMPANY_COUNT)
            .map(|_| {
                let name: String = CompanyName().fake();
                Company {
                    id: generate_id(),
                    domain: domain_for(&name),
                    name,
                    industry: Industry().fake(),
                    city: CityName().fake(),
                    phone: PhoneNumber().fake(),
                    owner: owner.to_string(),
                    lifecycle_stage: Faker.fake(),
                    created_at: now.clone(),
                    updated_at: now.clone(),
                }
            })
            .collect();

        let contacts: Vec<Contact> = (0..CONTACT_COUNT)
            .map(|i| {
                let mut contact: Contact = Faker.fake();
                contact.id = generate_id();
                contact.phone = PhoneNumber().fake();
                contact.company = companies[i % companies.len()].name.clone();
                contact.owner = owner.to_string();
                contact.created_at = now.clone();
                contact.updated_at = now.clone();
                contact
            })
            .collect();

        let deals: Vec<Deal> = (0..DEAL_COUNT)
            .map(|i| {
                let company = &companies[i % companies.len()];
                Deal {
                    id: generate_id(),
                    name: format!("{} renewal", company.name),
                    stage: Faker.fake(),
                    amount: (rng.gen_range(10..500) * 100) as f64,
                    close_date: Some(format!("2025-{:02}-15", (i % 12) + 1)),
                    owner: owner.to_string(),
                    company_id: Some(company.id.clone()),
                    created_at: now.clone(),
                    updated_at: now.clone(),
                }
            })
            .collect();

        let campaign = Campaign {
            id: generate_id(),
            name: "Spring Product Launch".to_string(),
            owner: owner.to_string(),
            start_date: Some("2025-03-01".to_string()),
            end_date: Some("2025-05-31".to_string()),
            status: CampaignStatus::Active,
            budget: 25_000.0,
            spend: 9_450.0,
            notes: "Launch of the new analytics add-on.".to_string(),
            assets: vec![
                Asset {
                    id: generate_id(),
                    name: "Launch announcement".to_string(),
                    kind: AssetKind::Email,
                },
                Asset {
                    id: generate_id(),
                    name: "Analytics add-on page".to_string(),
                    kind: AssetKind::LandingPage,
                },
            ],
            budget_items: vec![
                BudgetItem {
                    id: generate_id(),
                    name: "Paid social".to_string(),
                    category: "Advertising".to_string(),
                    amount: 12_000.0,
                },
                BudgetItem {
                    id: generate_id(),
                    name: "Webinar production".to_string(),
                    category: "Events".to_string(),
                    amount: 6_500.0,
                },
            ],
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let newsletter = Campaign {
            id: generate_id(),
            name: "Monthly Newsletter".to_string(),
            owner: owner.to_string(),
            start_date: Some("2025-01-01".to_string()),
            end_date: Some("2025-12-31".to_string()),
            status: CampaignStatus::Draft,
            budget: 3_000.0,
            spend: 0.0,
            notes: String::new(),
            assets: vec![],
            budget_items: vec![],
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let emails = vec![
            Email {
                id: generate_id(),
                name: "Launch announcement".to_string(),
                subject: "Meet the new analytics add-on".to_string(),
                status: EmailStatus::Sent,
                metrics: EmailMetrics {
                    sent: 4_200,
                    delivered: 4_105,
                    opened: 1_570,
                    clicked: 402,
                },
                content: vec![
                    ContentBlock::Text {
                        content: "Dashboards that answer questions before you ask them."
                            .to_string(),
                    },
                    ContentBlock::Button {
                        label: "See it in action".to_string(),
                        url: "https://example.com/analytics".to_string(),
                    },
                ],
                campaign_id: Some(campaign.id.clone()),
                scheduled_at: None,
                sent_at: Some(now.clone()),
                created_at: now.clone(),
                updated_at: now.clone(),
            },
            Email {
                id: generate_id(),
                name: "Webinar reminder".to_string(),
                subject: "Starting in one hour".to_string(),
                status: EmailStatus::Scheduled,
                metrics: EmailMetrics::default(),
                content: vec![ContentBlock::Text {
                    content: "Grab a coffee, we start soon.".to_string(),
                }],
                campaign_id: Some(campaign.id.clone()),
                scheduled_at: Some("2025-04-10T15:00:00.000Z".to_string()),
                sent_at: None,
                created_at: now.clone(),
                updated_at: now.clone(),
            },
            Email {
                id: generate_id(),
                name: "January newsletter".to_string(),
                subject: "What we shipped this month".to_string(),
                status: EmailStatus::Draft,
                metrics: EmailMetrics::default(),
                content: vec![],
                campaign_id: Some(newsletter.id.clone()),
                scheduled_at: None,
                sent_at: None,
                created_at: now.clone(),
                updated_at: now.clone(),
            },
        ];

        let tasks = vec![
            Task {
                id: generate_id(),
                title: "Review landing page copy".to_string(),
                task_type: TaskType::Todo,
                status: TaskStatus::InProgress,
                priority: Priority::High,
                due_date: Some("2025-03-10".to_string()),
                due_time: Some("10:00".to_string()),
                campaign_id: Some(campaign.id.clone()),
                notes: String::new(),
                created_at: now.clone(),
                updated_at: now.clone(),
            },
            Task {
                id: generate_id(),
                title: "Call agency about ad creatives".to_string(),
                task_type: TaskType::Call,
                status: TaskStatus::NotStarted,
                priority: Priority::Medium,
                due_date: Some("2025-03-14".to_string()),
                due_time: None,
                campaign_id: Some(campaign.id.clone()),
                notes: String::new(),
                created_at: now.clone(),
                updated_at: now.clone(),
            },
        ];

        let lists = vec![CrmList {
            id: generate_id(),
            name: "Newsletter subscribers".to_string(),
            kind: ListKind::Static,
            object_type: ListObjectType::Contacts,
            member_ids: contacts.iter().take(5).map(|c| c.id.clone()).collect(),
            owner: owner.to_string(),
            created_at: now.clone(),
            updated_at: now.clone(),
        }];

        let playbooks = vec![Playbook {
            id: generate_id(),
            name: "Discovery call".to_string(),
            description: "Questions to qualify an inbound lead.".to_string(),
            owner: owner.to_string(),
            created_at: now.clone(),
            updated_at: now.clone(),
        }];

        let templates = vec![
            Template {
                id: generate_id(),
                name: "Welcome".to_string(),
                subject: "Welcome aboard".to_string(),
                body: "Thanks for signing up. Here is how to get started.".to_string(),
                category: "Onboarding".to_string(),
                created_at: now.clone(),
                updated_at: now.clone(),
            },
            Template {
                id: generate_id(),
                name: "Event invitation".to_string(),
                subject: "You're invited".to_string(),
                body: "Join us for a live walkthrough of what's new.".to_string(),
                category: "Events".to_string(),
                created_at: now.clone(),
                updated_at: now,
            },
        ];

        DemoData {
            contacts,
            companies,
            deals,
            campaigns: vec![campaign, newsletter],
            emails,
            tasks,
            lists,
            playbooks,
            templates,
        }
    }
}

fn domain_for(name: &str) -> String {
    let slug: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    format!("{}.com", slug)
}
