use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A parliamentary candidate profile. Family members and media links are
/// embedded documents, stored as JSON alongside the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_bn: Option<String>,
    pub party: String,
    pub constituency: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub assets: Option<String>,
    #[serde(default)]
    pub liabilities: Option<String>,
    #[serde(default)]
    pub criminal_cases: Option<String>,
    #[serde(default)]
    pub family: Vec<FamilyMember>,
    #[serde(default)]
    pub media: Vec<MediaLink>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyMember {
    pub name: String,
    pub relation: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaLink {
    pub title: String,
    pub url: String,
    /// "news", "video" or "social".
    pub kind: String,
}

/// Fields accepted when creating or replacing a candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateInput {
    pub name: String,
    #[serde(default)]
    pub name_bn: Option<String>,
    pub party: String,
    pub constituency: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub assets: Option<String>,
    #[serde(default)]
    pub liabilities: Option<String>,
    #[serde(default)]
    pub criminal_cases: Option<String>,
    #[serde(default)]
    pub family: Vec<FamilyMember>,
    #[serde(default)]
    pub media: Vec<MediaLink>,
}

impl Candidate {
    pub fn from_input(input: CandidateInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            name_bn: input.name_bn,
            party: input.party,
            constituency: input.constituency,
            photo_url: input.photo_url,
            biography: input.biography,
            education: input.education,
            occupation: input.occupation,
            assets: input.assets,
            liabilities: input.liabilities,
            criminal_cases: input.criminal_cases,
            family: input.family,
            media: input.media,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One general election, identified by its parliament number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Election {
    pub id: String,
    pub parliament: i64,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub results: Vec<CandidateResult>,
    #[serde(default)]
    pub stats: Option<VoterStats>,
}

/// A single candidate's result line within an election or constituency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    pub constituency: String,
    pub candidate_name: String,
    pub party: String,
    pub votes: i64,
    #[serde(default)]
    pub winner: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoterStats {
    pub registered_voters: i64,
    pub votes_cast: i64,
    pub turnout_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionInput {
    pub parliament: i64,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub results: Vec<CandidateResult>,
    #[serde(default)]
    pub stats: Option<VoterStats>,
}

impl Election {
    pub fn from_input(input: ElectionInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            parliament: input.parliament,
            name: input.name,
            date: input.date,
            results: input.results,
            stats: input.stats,
        }
    }
}

/// An electoral district (seat), e.g. "Dhaka-10".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constituency {
    pub id: String,
    pub seat: i64,
    pub name: String,
    pub division: String,
    pub district: String,
    #[serde(default)]
    pub results: Vec<CandidateResult>,
    #[serde(default)]
    pub stats: Option<VoterStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstituencyInput {
    pub seat: i64,
    pub name: String,
    pub division: String,
    pub district: String,
    #[serde(default)]
    pub results: Vec<CandidateResult>,
    #[serde(default)]
    pub stats: Option<VoterStats>,
}

impl Constituency {
    pub fn from_input(input: ConstituencyInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            seat: input.seat,
            name: input.name,
            division: input.division,
            district: input.district,
            results: input.results,
            stats: input.stats,
        }
    }
}

/// Party membership in an electoral alliance, scoped to one parliament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyAlliance {
    pub id: String,
    pub party: String,
    pub alliance: String,
    pub candidate_count: i64,
    pub parliament: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyAllianceInput {
    pub party: String,
    pub alliance: String,
    pub candidate_count: i64,
    pub parliament: i64,
}

impl PartyAlliance {
    pub fn from_input(input: PartyAllianceInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            party: input.party,
            alliance: input.alliance,
            candidate_count: input.candidate_count,
            parliament: input.parliament,
        }
    }
}

/// A reader poll with bilingual question and option text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    pub question_en: String,
    pub question_bn: String,
    pub options: Vec<PollOption>,
    pub open: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOption {
    pub label_en: String,
    pub label_bn: String,
    #[serde(default)]
    pub votes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollInput {
    pub question_en: String,
    pub question_bn: String,
    pub options: Vec<PollOption>,
}

impl Poll {
    pub fn from_input(input: PollInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question_en: input.question_en,
            question_bn: input.question_bn,
            options: input
                .options
                .into_iter()
                .map(|o| PollOption { votes: 0, ..o })
                .collect(),
            open: true,
            created_at: Utc::now(),
        }
    }
}

/// A blog / newsfeed entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostInput {
    pub slug: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

impl Post {
    pub fn from_input(input: PostInput) -> Self {
        let published_at = input.published.then(Utc::now);
        Self {
            id: Uuid::new_v4().to_string(),
            slug: input.slug,
            title: input.title,
            body: input.body,
            cover_url: input.cover_url,
            tags: input.tags,
            published: input.published,
            published_at,
        }
    }
}

/// A dashboard administrator. The verification code is short-lived state
/// for the two-step login handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    #[serde(skip_serializing)]
    pub code_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            verification_code: None,
            code_expires_at: None,
            created_at: Utc::now(),
        }
    }
}
