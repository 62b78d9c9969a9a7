//! Sample-data seeding for local development and demos. Four parliaments of
//! winner records across a handful of constituencies, chosen so the swing
//! table exercises every bucket.

use chrono::NaiveDate;

use crate::database::{Database, Result};
use crate::models::{
    Admin, Candidate, CandidateInput, CandidateResult, Constituency, ConstituencyInput, Election,
    ElectionInput, FamilyMember, MediaLink, PartyAlliance, PartyAllianceInput, Poll, PollInput,
    PollOption, Post, PostInput, VoterStats,
};

pub struct SeedSummary {
    pub candidates: usize,
    pub elections: usize,
    pub constituencies: usize,
    pub alliances: usize,
    pub polls: usize,
    pub posts: usize,
    pub admins: usize,
}

pub async fn seed_all(db: &Database) -> Result<SeedSummary> {
    let candidates = seed_candidates(db).await?;
    let elections = seed_elections(db).await?;
    let constituencies = seed_constituencies(db).await?;
    let alliances = seed_alliances(db).await?;
    let polls = seed_polls(db).await?;
    let posts = seed_posts(db).await?;
    let admins = seed_admins(db).await?;

    Ok(SeedSummary {
        candidates,
        elections,
        constituencies,
        alliances,
        polls,
        posts,
        admins,
    })
}

fn result(
    constituency: &str,
    candidate: &str,
    party: &str,
    votes: i64,
    winner: bool,
) -> CandidateResult {
    CandidateResult {
        constituency: constituency.to_string(),
        candidate_name: candidate.to_string(),
        party: party.to_string(),
        votes,
        winner,
    }
}

async fn seed_candidates(db: &Database) -> Result<usize> {
    let inputs = vec![
        CandidateInput {
            name: "Rahim Uddin".to_string(),
            name_bn: Some("রহিম উদ্দিন".to_string()),
            party: "AL".to_string(),
            constituency: "Dhaka-10".to_string(),
            photo_url: None,
            biography: Some("Three-term member of parliament from the capital.".to_string()),
            education: Some("MA in Economics, University of Dhaka".to_string()),
            occupation: Some("Businessman".to_string()),
            assets: Some("Two flats in Dhanmondi, agricultural land in Faridpur".to_string()),
            liabilities: Some("Bank loan, BDT 1.2 crore".to_string()),
            criminal_cases: None,
            family: vec![FamilyMember {
                name: "Karima Uddin".to_string(),
                relation: "spouse".to_string(),
                photo_url: None,
            }],
            media: vec![MediaLink {
                title: "Campaign launch coverage".to_string(),
                url: "https://example.org/news/rahim-launch".to_string(),
                kind: "news".to_string(),
            }],
        },
        CandidateInput {
            name: "Selina Akhter".to_string(),
            name_bn: Some("সেলিনা আক্তার".to_string()),
            party: "BNP".to_string(),
            constituency: "Bogra-4".to_string(),
            photo_url: None,
            biography: Some("Lawyer and long-time opposition organizer.".to_string()),
            education: Some("LLB, Rajshahi University".to_string()),
            occupation: Some("Advocate, Supreme Court".to_string()),
            assets: None,
            liabilities: None,
            criminal_cases: Some("Two pending cases, both politically contested".to_string()),
            family: vec![],
            media: vec![MediaLink {
                title: "Town hall, full video".to_string(),
                url: "https://example.org/video/selina-townhall".to_string(),
                kind: "video".to_string(),
            }],
        },
        CandidateInput {
            name: "Mofazzal Karim".to_string(),
            name_bn: Some("মোফাজ্জল করিম".to_string()),
            party: "JP".to_string(),
            constituency: "Rangpur-3".to_string(),
            photo_url: None,
            biography: Some("Party stronghold incumbent.".to_string()),
            education: None,
            occupation: Some("Retired army officer".to_string()),
            assets: None,
            liabilities: None,
            criminal_cases: None,
            family: vec![FamilyMember {
                name: "Tanvir Karim".to_string(),
                relation: "son".to_string(),
                photo_url: None,
            }],
            media: vec![],
        },
    ];

    let count = inputs.len();
    for input in inputs {
        db.insert_candidate(&Candidate::from_input(input)).await?;
    }
    Ok(count)
}

async fn seed_elections(db: &Database) -> Result<usize> {
    // Dhaka-10: AL four times (solid). Bogra-4: BNP three of four (leaning).
    // Khulna-2: two apiece (toss-up). Sylhet-1: AL twice, BNP and JP once
    // each (competitive). Rangpur-3: JP throughout.
    let elections = vec![
        ElectionInput {
            parliament: 9,
            name: "9th Parliamentary Election".to_string(),
            date: NaiveDate::from_ymd_opt(2008, 12, 29).unwrap(),
            results: vec![
                result("Dhaka-10", "Rahim Uddin", "AL", 97_543, true),
                result("Dhaka-10", "Jashim Mollah", "BNP", 61_220, false),
                result("Bogra-4", "Selina Akhter", "BNP", 88_410, true),
                result("Bogra-4", "Anwar Hossain", "AL", 72_133, false),
                result("Khulna-2", "Farid Gazi", "AL", 75_002, true),
                result("Khulna-2", "Nazrul Islam", "BNP", 70_551, false),
                result("Sylhet-1", "Abul Maal", "AL", 101_093, true),
                result("Sylhet-1", "Saifur Rahman", "BNP", 94_055, false),
                result("Rangpur-3", "Mofazzal Karim", "JP", 65_880, true),
            ],
            stats: Some(VoterStats {
                registered_voters: 81_130_973,
                votes_cast: 70_648_485,
                turnout_pct: 87.1,
            }),
        },
        ElectionInput {
            parliament: 10,
            name: "10th Parliamentary Election".to_string(),
            date: NaiveDate::from_ymd_opt(2014, 1, 5).unwrap(),
            results: vec![
                result("Dhaka-10", "Rahim Uddin", "AL", 54_310, true),
                result("Bogra-4", "Anwar Hossain", "AL", 41_207, true),
                result("Bogra-4", "Selina Akhter", "BNP", 39_884, false),
                result("Khulna-2", "Nazrul Islam", "BNP", 48_112, true),
                result("Khulna-2", "Farid Gazi", "AL", 46_003, false),
                result("Sylhet-1", "Abul Maal", "AL", 62_450, true),
                result("Sylhet-1", "Monaem Khan", "JP", 31_226, false),
                result("Rangpur-3", "Mofazzal Karim", "JP", 58_734, true),
            ],
            stats: Some(VoterStats {
                registered_voters: 92_007_113,
                votes_cast: 36_802_845,
                turnout_pct: 40.0,
            }),
        },
        ElectionInput {
            parliament: 11,
            name: "11th Parliamentary Election".to_string(),
            date: NaiveDate::from_ymd_opt(2018, 12, 30).unwrap(),
            results: vec![
                result("Dhaka-10", "Rahim Uddin", "AL", 121_887, true),
                result("Dhaka-10", "Jashim Mollah", "BNP", 33_902, false),
                result("Bogra-4", "Selina Akhter", "BNP", 91_300, true),
                result("Bogra-4", "Anwar Hossain", "AL", 83_276, false),
                result("Khulna-2", "Farid Gazi", "AL", 88_650, true),
                result("Khulna-2", "Nazrul Islam", "BNP", 45_008, false),
                result("Sylhet-1", "Monaem Khan", "JP", 77_431, true),
                result("Sylhet-1", "Abdul Momen", "AL", 75_220, false),
                result("Rangpur-3", "Mofazzal Karim", "JP", 81_412, true),
            ],
            stats: Some(VoterStats {
                registered_voters: 104_192_951,
                votes_cast: 83_354_361,
                turnout_pct: 80.0,
            }),
        },
        ElectionInput {
            parliament: 12,
            name: "12th Parliamentary Election".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            results: vec![
                result("Dhaka-10", "Rahim Uddin", "AL", 81_234, true),
                result("Dhaka-10", "Firoz Alam", "JP", 12_998, false),
                result("Bogra-4", "Selina Akhter", "BNP", 68_110, true),
                result("Bogra-4", "Anwar Hossain", "AL", 66_905, false),
                result("Khulna-2", "Nazrul Islam", "BNP", 59_881, true),
                result("Khulna-2", "Farid Gazi", "AL", 58_344, false),
                result("Sylhet-1", "Abdul Momen", "BNP", 69_005, true),
                result("Sylhet-1", "Monaem Khan", "JP", 64_118, false),
                result("Rangpur-3", "Mofazzal Karim", "JP", 72_065, true),
            ],
            stats: Some(VoterStats {
                registered_voters: 119_691_633,
                votes_cast: 49_552_736,
                turnout_pct: 41.4,
            }),
        },
    ];

    let count = elections.len();
    for input in elections {
        db.insert_election(&Election::from_input(input)).await?;
    }
    Ok(count)
}

async fn seed_constituencies(db: &Database) -> Result<usize> {
    let constituencies = vec![
        ConstituencyInput {
            seat: 183,
            name: "Dhaka-10".to_string(),
            division: "Dhaka".to_string(),
            district: "Dhaka".to_string(),
            results: vec![
                result("Dhaka-10", "Rahim Uddin", "AL", 81_234, true),
                result("Dhaka-10", "Firoz Alam", "JP", 12_998, false),
            ],
            stats: Some(VoterStats {
                registered_voters: 312_000,
                votes_cast: 98_540,
                turnout_pct: 31.6,
            }),
        },
        ConstituencyInput {
            seat: 39,
            name: "Bogra-4".to_string(),
            division: "Rajshahi".to_string(),
            district: "Bogra".to_string(),
            results: vec![
                result("Bogra-4", "Selina Akhter", "BNP", 68_110, true),
                result("Bogra-4", "Anwar Hossain", "AL", 66_905, false),
            ],
            stats: Some(VoterStats {
                registered_voters: 289_400,
                votes_cast: 140_122,
                turnout_pct: 48.4,
            }),
        },
        ConstituencyInput {
            seat: 100,
            name: "Khulna-2".to_string(),
            division: "Khulna".to_string(),
            district: "Khulna".to_string(),
            results: vec![
                result("Khulna-2", "Nazrul Islam", "BNP", 59_881, true),
                result("Khulna-2", "Farid Gazi", "AL", 58_344, false),
            ],
            stats: None,
        },
        ConstituencyInput {
            seat: 229,
            name: "Sylhet-1".to_string(),
            division: "Sylhet".to_string(),
            district: "Sylhet".to_string(),
            results: vec![
                result("Sylhet-1", "Abdul Momen", "BNP", 69_005, true),
                result("Sylhet-1", "Monaem Khan", "JP", 64_118, false),
            ],
            stats: None,
        },
        ConstituencyInput {
            seat: 21,
            name: "Rangpur-3".to_string(),
            division: "Rangpur".to_string(),
            district: "Rangpur".to_string(),
            results: vec![result("Rangpur-3", "Mofazzal Karim", "JP", 72_065, true)],
            stats: None,
        },
    ];

    let count = constituencies.len();
    for input in constituencies {
        db.insert_constituency(&Constituency::from_input(input)).await?;
    }
    Ok(count)
}

async fn seed_alliances(db: &Database) -> Result<usize> {
    let alliances = vec![
        PartyAllianceInput {
            party: "AL".to_string(),
            alliance: "Grand Alliance".to_string(),
            candidate_count: 263,
            parliament: 12,
        },
        PartyAllianceInput {
            party: "JP".to_string(),
            alliance: "Grand Alliance".to_string(),
            candidate_count: 26,
            parliament: 12,
        },
        PartyAllianceInput {
            party: "BNP".to_string(),
            alliance: "20 Party Alliance".to_string(),
            candidate_count: 256,
            parliament: 11,
        },
        PartyAllianceInput {
            party: "JI".to_string(),
            alliance: "20 Party Alliance".to_string(),
            candidate_count: 22,
            parliament: 11,
        },
    ];

    let count = alliances.len();
    for input in alliances {
        db.insert_alliance(&PartyAlliance::from_input(input)).await?;
    }
    Ok(count)
}

async fn seed_polls(db: &Database) -> Result<usize> {
    let poll = Poll::from_input(PollInput {
        question_en: "Which alliance will form the next government?".to_string(),
        question_bn: "পরবর্তী সরকার কোন জোট গঠন করবে?".to_string(),
        options: vec![
            PollOption {
                label_en: "Grand Alliance".to_string(),
                label_bn: "মহাজোট".to_string(),
                votes: 0,
            },
            PollOption {
                label_en: "20 Party Alliance".to_string(),
                label_bn: "২০ দলীয় জোট".to_string(),
                votes: 0,
            },
            PollOption {
                label_en: "Undecided".to_string(),
                label_bn: "সিদ্ধান্তহীন".to_string(),
                votes: 0,
            },
        ],
    });
    db.insert_poll(&poll).await?;
    Ok(1)
}

async fn seed_posts(db: &Database) -> Result<usize> {
    let posts = vec![
        PostInput {
            slug: "how-swing-seats-are-classified".to_string(),
            title: "How we classify swing seats".to_string(),
            body: "A constituency that one party wins every cycle is solid; one that \
                   flips back and forth is a toss-up. Here is the full method."
                .to_string(),
            cover_url: None,
            tags: vec!["methodology".to_string(), "analysis".to_string()],
            published: true,
        },
        PostInput {
            slug: "turnout-since-2008".to_string(),
            title: "Turnout since 2008, in five charts".to_string(),
            body: "Registered voters nearly doubled while turnout halved.".to_string(),
            cover_url: None,
            tags: vec!["turnout".to_string()],
            published: true,
        },
    ];

    let count = posts.len();
    for input in posts {
        db.insert_post(&Post::from_input(input)).await?;
    }
    Ok(count)
}

async fn seed_admins(db: &Database) -> Result<usize> {
    db.insert_admin(&Admin::new("editor@votebd.org", "Newsroom Editor"))
        .await?;
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{self, Competitiveness};

    #[tokio::test]
    async fn seeded_data_covers_every_swing_bucket() {
        let db = Database::create_in_memory().await.unwrap();
        let summary = seed_all(&db).await.unwrap();
        assert_eq!(summary.elections, 4);
        assert!(summary.candidates > 0);

        let records = db.get_winner_records().await.unwrap();
        let table = analysis::swing_table(&records);
        assert!(!table.is_empty());

        let label_of = |name: &str| {
            table
                .iter()
                .find(|s| s.constituency == name)
                .map(|s| s.label)
                .unwrap()
        };
        assert_eq!(label_of("Dhaka-10"), Competitiveness::Solid);
        assert_eq!(label_of("Bogra-4"), Competitiveness::Leaning);
        assert_eq!(label_of("Khulna-2"), Competitiveness::TossUp);
        assert_eq!(label_of("Sylhet-1"), Competitiveness::Competitive);
        assert_eq!(label_of("Rangpur-3"), Competitiveness::Solid);
    }
}
