//! Keyword lexicon — the role, domain, company and trait signals the pipeline recognizes.
//!
//! Matching is case-insensitive and word-bounded, so `java` does not match inside
//! `javascript` and `sql` does not match inside `postgresql`.

use crate::generation::models::TipCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// A concrete technology or competency. Also recognized as an applicant skill.
    Skill,
    /// A role noun ("engineer", "analyst").
    Role,
    /// Something about the employer or its domain.
    Company,
    /// A soft-skill or working-style expectation.
    Trait,
}

#[derive(Debug)]
pub struct Signal {
    /// Display spelling.
    pub label: &'static str,
    /// Lowercase spellings that count as a match.
    pub terms: &'static [&'static str],
    pub kind: SignalKind,
    pub category: TipCategory,
    pub tip: &'static str,
}

const fn skill(label: &'static str, terms: &'static [&'static str], tip: &'static str) -> Signal {
    Signal {
        label,
        terms,
        kind: SignalKind::Skill,
        category: TipCategory::Technical,
        tip,
    }
}

pub static LEXICON: &[Signal] = &[
    // ── Skills ──────────────────────────────────────────────────────────────
    skill("Rust", &["rust"],
        "Be ready to explain Rust ownership and borrowing, and walk through a Rust project where you handled errors and concurrency."),
    skill("Python", &["python"],
        "Expect hands-on Python questions; review data structures, packaging, and how you test Python code."),
    skill("JavaScript", &["javascript", "js"],
        "Review JavaScript fundamentals such as closures, promises, and the event loop, and be ready to live-code."),
    skill("TypeScript", &["typescript"],
        "Be prepared to discuss how you use TypeScript types to catch bugs early in a large codebase."),
    skill("Java", &["java"],
        "Brush up on Java collections, concurrency utilities, and JVM memory basics."),
    skill("Go", &["golang"],
        "Prepare to talk about goroutines, channels, and error handling patterns in Go services."),
    skill("C++", &["c++"],
        "Review C++ memory management, RAII, and performance trade-offs you have made."),
    skill("C#", &["c#", ".net"],
        "Review C# async patterns, LINQ, and how you structure .NET services."),
    skill("React", &["react", "react.js", "reactjs"],
        "Be ready to discuss React component design, state management, and rendering performance."),
    skill("Node.js", &["node.js", "nodejs"],
        "Prepare examples of Node.js services you built, including async error handling."),
    skill("SQL", &["sql"],
        "Practice writing SQL joins and aggregations, and explain how you would index a slow query."),
    skill("PostgreSQL", &["postgresql", "postgres"],
        "Be ready to discuss PostgreSQL schema design, indexing, and transaction isolation."),
    skill("AWS", &["aws", "amazon web services"],
        "Prepare to describe the AWS services you have deployed to and how you controlled cost and access."),
    skill("Docker", &["docker"],
        "Expect questions on containerizing applications with Docker and keeping images small and reproducible."),
    skill("Kubernetes", &["kubernetes", "k8s"],
        "Review Kubernetes deployments, services, and how you would debug a failing pod."),
    skill("Linux", &["linux"],
        "Refresh your Linux command-line skills: processes, permissions, networking, and log inspection."),
    skill("machine learning", &["machine learning", "deep learning"],
        "Be prepared to walk through a machine learning project end to end: data, model choice, evaluation, and deployment."),
    skill("data analysis", &["data analysis", "analytics"],
        "Bring an example of an analysis that changed a decision, and explain your method and tools."),
    skill("API design", &["api", "apis", "graphql"],
        "Be ready to design an API on a whiteboard, covering versioning, pagination, and error handling."),
    skill("distributed systems", &["distributed systems", "microservices"],
        "Prepare for a system design round: scaling, consistency trade-offs, and failure handling."),
    skill("testing", &["testing", "test automation", "tdd"],
        "Describe your testing strategy and a bug your tests caught before it reached production."),
    skill("CI/CD", &["ci/cd", "continuous integration", "devops"],
        "Be ready to explain a CI/CD pipeline you built or improved and what it automated."),
    skill("security", &["security", "cybersecurity"],
        "Review common security vulnerabilities and how you have mitigated them in past work."),
    skill("WordPress", &["wordpress"],
        "Research common WordPress development interview questions, including themes, plugins, and hooks."),
    skill("UX design", &["figma", "ux", "ui/ux", "user experience"],
        "Prepare a portfolio walkthrough that explains the research and decisions behind your designs."),
    // ── Roles ───────────────────────────────────────────────────────────────
    Signal {
        label: "engineer",
        terms: &["engineer", "engineers", "engineering"],
        kind: SignalKind::Role,
        category: TipCategory::Technical,
        tip: "Expect a technical screen; practice explaining your reasoning out loud while you solve problems.",
    },
    Signal {
        label: "developer",
        terms: &["developer", "developers", "programmer"],
        kind: SignalKind::Role,
        category: TipCategory::Technical,
        tip: "Prepare examples of past projects that show both front-end and back-end skills, and the code quality behind them.",
    },
    Signal {
        label: "data scientist",
        terms: &["data scientist", "data science"],
        kind: SignalKind::Role,
        category: TipCategory::Technical,
        tip: "Review statistics fundamentals and be ready to explain how you validate a model before trusting it.",
    },
    Signal {
        label: "designer",
        terms: &["designer", "designers"],
        kind: SignalKind::Role,
        category: TipCategory::Technical,
        tip: "Expect a design exercise; practice talking through constraints and trade-offs as you sketch.",
    },
    Signal {
        label: "analyst",
        terms: &["analyst", "analysts"],
        kind: SignalKind::Role,
        category: TipCategory::Technical,
        tip: "Expect a case exercise; practice structuring an ambiguous business question into measurable parts.",
    },
    Signal {
        label: "manager",
        terms: &["manager", "management"],
        kind: SignalKind::Role,
        category: TipCategory::Behavioral,
        tip: "Prepare stories about leading people through change, giving hard feedback, and resolving conflict.",
    },
    // ── Company and domain ─────────────────────────────────────────────────
    Signal {
        label: "startup",
        terms: &["startup", "start-up", "fast-paced"],
        kind: SignalKind::Company,
        category: TipCategory::CompanySpecific,
        tip: "Show you are comfortable with ambiguity; prepare an example of wearing multiple hats under a tight deadline.",
    },
    Signal {
        label: "mission",
        terms: &["mission", "values"],
        kind: SignalKind::Company,
        category: TipCategory::CompanySpecific,
        tip: "Read the company's mission and values, and connect one of them to your own motivation for applying.",
    },
    Signal {
        label: "customers",
        terms: &["customer", "customers", "clients", "users"],
        kind: SignalKind::Company,
        category: TipCategory::CompanySpecific,
        tip: "Learn who the company's customers are and be ready to explain how your work would improve their experience.",
    },
    Signal {
        label: "product",
        terms: &["product", "products"],
        kind: SignalKind::Company,
        category: TipCategory::CompanySpecific,
        tip: "Use the company's product before the interview and note one concrete improvement you would suggest.",
    },
    Signal {
        label: "fintech",
        terms: &["fintech", "payments", "banking"],
        kind: SignalKind::Company,
        category: TipCategory::CompanySpecific,
        tip: "Brush up on the reliability and regulatory expectations that financial products must meet.",
    },
    Signal {
        label: "healthcare",
        terms: &["healthcare", "patients", "clinical"],
        kind: SignalKind::Company,
        category: TipCategory::CompanySpecific,
        tip: "Understand the privacy and compliance constraints healthcare products operate under.",
    },
    Signal {
        label: "e-commerce",
        terms: &["e-commerce", "ecommerce", "retail"],
        kind: SignalKind::Company,
        category: TipCategory::CompanySpecific,
        tip: "Study the company's storefront and checkout flow, and think about one improvement you could propose.",
    },
    Signal {
        label: "remote",
        terms: &["remote", "distributed team"],
        kind: SignalKind::Company,
        category: TipCategory::CompanySpecific,
        tip: "Explain how you stay productive and visible on a remote team, with concrete habits and tools.",
    },
    // ── Traits ──────────────────────────────────────────────────────────────
    Signal {
        label: "collaboration",
        terms: &["collaborate", "collaboration", "collaborative", "teamwork", "team player", "cross-functional"],
        kind: SignalKind::Trait,
        category: TipCategory::Behavioral,
        tip: "Prepare a STAR story about collaborating across teams to deliver a shared goal.",
    },
    Signal {
        label: "communication",
        terms: &["communication", "communicate", "stakeholder", "stakeholders"],
        kind: SignalKind::Trait,
        category: TipCategory::Behavioral,
        tip: "Have an example ready of explaining a technical topic to a non-technical stakeholder.",
    },
    Signal {
        label: "leadership",
        terms: &["leadership", "mentor", "mentoring", "mentorship"],
        kind: SignalKind::Trait,
        category: TipCategory::Behavioral,
        tip: "Prepare an example of mentoring someone or leading an initiative, including the measurable outcome.",
    },
    Signal {
        label: "problem solving",
        terms: &["problem solving", "problem-solving", "troubleshooting", "debugging"],
        kind: SignalKind::Trait,
        category: TipCategory::Behavioral,
        tip: "Pick a hard problem you solved and walk through how you diagnosed it step by step.",
    },
    Signal {
        label: "agile",
        terms: &["agile", "scrum", "sprint", "sprints"],
        kind: SignalKind::Trait,
        category: TipCategory::Behavioral,
        tip: "Be ready to describe how you work within agile ceremonies and handle shifting priorities.",
    },
    Signal {
        label: "ownership",
        terms: &["ownership", "self-starter", "independently", "autonomy"],
        kind: SignalKind::Trait,
        category: TipCategory::Behavioral,
        tip: "Prepare a story about taking ownership of a problem nobody had assigned to you.",
    },
];

/// A lexicon signal found in a piece of text.
#[derive(Debug, Clone, Copy)]
pub struct SignalHit {
    pub signal: &'static Signal,
    /// Total word-bounded occurrences across all of the signal's terms.
    pub count: usize,
    /// Position in `LEXICON`; used as the final tie-breaker.
    pub lexicon_index: usize,
}

/// Returns every lexicon signal present in `text`, in lexicon order.
pub fn detect_signals(text: &str) -> Vec<SignalHit> {
    let haystack = text.to_lowercase();
    LEXICON
        .iter()
        .enumerate()
        .filter_map(|(lexicon_index, signal)| {
            let count: usize = signal
                .terms
                .iter()
                .map(|term| count_bounded(&haystack, term))
                .sum();
            (count > 0).then_some(SignalHit {
                signal,
                count,
                lexicon_index,
            })
        })
        .collect()
}

/// Counts occurrences of `term` in `haystack` not embedded in a longer alphanumeric word.
pub fn count_bounded(haystack: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    haystack
        .match_indices(term)
        .filter(|(start, _)| {
            let before = haystack[..*start].chars().next_back();
            let after = haystack[start + term.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(hits: &[SignalHit]) -> Vec<&'static str> {
        hits.iter().map(|h| h.signal.label).collect()
    }

    #[test]
    fn test_word_boundaries() {
        assert_eq!(count_bounded("javascript and java", "java"), 1);
        assert_eq!(count_bounded("postgresql", "sql"), 0);
        assert_eq!(count_bounded("c++ and c++17", "c++"), 1);
        assert_eq!(count_bounded("rust, rust; trust", "rust"), 2);
    }

    #[test]
    fn test_detect_signals_counts_aliases() {
        let hits = detect_signals("Kubernetes (k8s) experience. We deploy to K8s daily.");
        let kube = hits.iter().find(|h| h.signal.label == "Kubernetes").unwrap();
        assert_eq!(kube.count, 3);
    }

    #[test]
    fn test_detect_signals_is_in_lexicon_order() {
        let hits = detect_signals("Agile team needs a Rust engineer who knows Docker");
        assert_eq!(labels(&hits), vec!["Rust", "Docker", "engineer", "agile"]);
    }

    #[test]
    fn test_no_signals_in_unrelated_text() {
        assert!(detect_signals("The quick brown fox jumps over the lazy dog").is_empty());
    }

    #[test]
    fn test_every_signal_has_a_tip_and_terms() {
        for signal in LEXICON {
            assert!(!signal.terms.is_empty(), "{} has no terms", signal.label);
            assert!(!signal.tip.is_empty(), "{} has no tip", signal.label);
            for term in signal.terms {
                assert_eq!(*term, term.to_lowercase(), "{term} must be lowercase");
            }
        }
    }
}
