//! Listing entities: companies and jobs under one minimal shared shape

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The shape every listing exposes to filtering and ordering.
///
/// Everything the view engine needs is here:
/// - id: opaque identifier, unique within a collection
/// - display_field: the human-readable label matched against the search query
/// - created_at: creation timestamp used for recency ordering
///
/// Domain fields (salary, logo, ...) are deliberately not part of this trait;
/// they are only reachable after matching on [`Entity`].
pub trait Listing {
    /// Opaque unique identifier
    fn id(&self) -> &str;

    /// Label used for search matching (company name or job title)
    fn display_field(&self) -> &str;

    /// Creation timestamp
    fn created_at(&self) -> DateTime<Utc>;
}

/// A company as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Logo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// Owning recruiter, kept opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Company {
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            website: None,
            location: None,
            logo: None,
            user_id: None,
            created_at,
            updated_at: None,
        }
    }
}

/// A job posting as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub requirements: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Full-time, part-time, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,

    /// Number of open positions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    /// Either a company id or a populated company document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Value>,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            requirements: Vec::new(),
            salary: None,
            location: None,
            job_type: None,
            experience_level: None,
            position: None,
            company: None,
            created_by: None,
            created_at,
            updated_at: None,
        }
    }
}

impl Listing for Company {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_field(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Listing for Job {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_field(&self) -> &str {
        &self.title
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Discriminant of an [`Entity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Company,
    Job,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Company => "company",
            EntityKind::Job => "job",
        }
    }
}

/// A listing held by the collection store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Company(Company),
    Job(Job),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Company(_) => EntityKind::Company,
            Entity::Job(_) => EntityKind::Job,
        }
    }

    pub fn as_company(&self) -> Option<&Company> {
        match self {
            Entity::Company(company) => Some(company),
            Entity::Job(_) => None,
        }
    }

    pub fn as_job(&self) -> Option<&Job> {
        match self {
            Entity::Job(job) => Some(job),
            Entity::Company(_) => None,
        }
    }
}

impl Listing for Entity {
    fn id(&self) -> &str {
        match self {
            Entity::Company(company) => company.id(),
            Entity::Job(job) => job.id(),
        }
    }

    fn display_field(&self) -> &str {
        match self {
            Entity::Company(company) => company.display_field(),
            Entity::Job(job) => job.display_field(),
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        match self {
            Entity::Company(company) => company.created_at(),
            Entity::Job(job) => job.created_at(),
        }
    }
}

impl From<Company> for Entity {
    fn from(company: Company) -> Self {
        Entity::Company(company)
    }
}

impl From<Job> for Entity {
    fn from(job: Job) -> Self {
        Entity::Job(job)
    }
}
