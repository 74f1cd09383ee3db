use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::jobs::models::{Job, JobFilter, JobSort, NewJob};

/// Shown for postings made during this process's lifetime.
pub const JUST_NOW: &str = "Just now";

/// Newest first. Ids are `j1`, `j2`, ... and never reused, even after a removal.
#[derive(Debug, Clone)]
pub struct JobBoard {
    jobs: Vec<Job>,
    next_id: usize,
}

struct Seed {
    title: &'static str,
    department: &'static str,
    location: &'static str,
    description: &'static str,
    skills: &'static [&'static str],
    applicants: u32,
    matched: u32,
    top: u32,
    age_days: i64,
    posted_date: &'static str,
}

const SEED_JOBS: &[Seed] = &[
    Seed {
        title: "Senior Frontend Developer",
        department: "Engineering",
        location: "Remote",
        description: "We are looking for a Senior Frontend Developer to join our team and help build amazing user experiences.",
        skills: &["React", "TypeScript", "CSS", "GraphQL"],
        applicants: 78,
        matched: 24,
        top: 5,
        age_days: 14,
        posted_date: "2 weeks ago",
    },
    Seed {
        title: "Product Manager",
        department: "Product",
        location: "New York, NY",
        description: "As a Product Manager, you will be responsible for the product roadmap and working with cross-functional teams.",
        skills: &["Product Strategy", "Agile", "Roadmapping"],
        applicants: 56,
        matched: 18,
        top: 4,
        age_days: 7,
        posted_date: "1 week ago",
    },
    Seed {
        title: "UX Designer",
        department: "Design",
        location: "San Francisco, CA",
        description: "We're seeking a UX Designer who can create intuitive and beautiful user experiences for our products.",
        skills: &["Figma", "User Testing", "Wireframing"],
        applicants: 43,
        matched: 15,
        top: 3,
        age_days: 3,
        posted_date: "3 days ago",
    },
    Seed {
        title: "Data Scientist",
        department: "Data",
        location: "Chicago, IL",
        description: "Join our data science team to build and deploy machine learning models that drive our business forward.",
        skills: &["Python", "Machine Learning", "SQL", "TensorFlow"],
        applicants: 32,
        matched: 14,
        top: 3,
        age_days: 5,
        posted_date: "5 days ago",
    },
    Seed {
        title: "DevOps Engineer",
        department: "Engineering",
        location: "Remote",
        description: "We're looking for a DevOps Engineer to help us build and maintain our cloud infrastructure.",
        skills: &["AWS", "Docker", "Kubernetes", "CI/CD"],
        applicants: 28,
        matched: 10,
        top: 2,
        age_days: 7,
        posted_date: "1 week ago",
    },
    Seed {
        title: "Marketing Specialist",
        department: "Marketing",
        location: "Austin, TX",
        description: "As a Marketing Specialist, you will be responsible for creating and executing marketing campaigns.",
        skills: &["Content Strategy", "SEO", "Social Media"],
        applicants: 45,
        matched: 19,
        top: 4,
        age_days: 14,
        posted_date: "2 weeks ago",
    },
];

impl JobBoard {
    /// The six sample postings, dated relative to `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let jobs: Vec<Job> = SEED_JOBS
            .iter()
            .enumerate()
            .map(|(i, seed)| Job {
                id: format!("j{}", i + 1),
                title: seed.title.to_string(),
                department: seed.department.to_string(),
                location: seed.location.to_string(),
                description: Some(seed.description.to_string()),
                required_skills: seed.skills.iter().map(|s| s.to_string()).collect(),
                applicants: seed.applicants,
                matched_candidates: seed.matched,
                top_candidates: seed.top,
                posted_date: seed.posted_date.to_string(),
                posted_at: now - Duration::days(seed.age_days),
            })
            .collect();
        let next_id = jobs.len() + 1;
        Self { jobs, next_id }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Adds a posting at the front with zeroed counters.
    pub fn post(&mut self, new_job: NewJob, now: DateTime<Utc>) -> Job {
        let job = Job {
            id: format!("j{}", self.next_id),
            title: new_job.title,
            department: new_job.department,
            location: new_job.location,
            description: new_job.description,
            required_skills: new_job.required_skills,
            applicants: 0,
            matched_candidates: 0,
            top_candidates: 0,
            posted_date: JUST_NOW.to_string(),
            posted_at: now,
        };
        self.next_id += 1;
        self.jobs.insert(0, job.clone());
        info!("Job {} posted: {}", job.id, job.title);
        job
    }

    pub fn remove(&mut self, id: &str) -> Option<Job> {
        let index = self.jobs.iter().position(|j| j.id == id)?;
        Some(self.jobs.remove(index))
    }

    pub fn list(&self, filter: &JobFilter) -> Vec<Job> {
        let term = filter.search.trim().to_lowercase();
        let department = filter.department.trim();

        let mut jobs: Vec<Job> = self
            .jobs
            .iter()
            .filter(|job| {
                term.is_empty()
                    || job.title.to_lowercase().contains(&term)
                    || job.department.to_lowercase().contains(&term)
                    || job
                        .required_skills
                        .iter()
                        .any(|s| s.to_lowercase().contains(&term))
            })
            .filter(|job| {
                department.is_empty()
                    || department.eq_ignore_ascii_case("all")
                    || job.department.eq_ignore_ascii_case(department)
            })
            .cloned()
            .collect();

        // stable: equal keys keep board order
        match filter.sort {
            JobSort::Recent => jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at)),
            JobSort::Applicants => jobs.sort_by(|a, b| b.applicants.cmp(&a.applicants)),
            JobSort::Matches => {
                jobs.sort_by(|a, b| b.matched_candidates.cmp(&a.matched_candidates))
            }
        }
        jobs
    }
}
