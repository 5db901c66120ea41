use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::quiz::inline_check::{CheckQuestion, InlineCheck};
use crate::quiz::run::QuizRun;
use crate::quiz::Question;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(alias = "q")]
    pub question: String,
    #[serde(alias = "a")]
    pub answer: String,
}

/// End-of-section quiz as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizContent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<u8>,
    pub questions: Vec<Question>,
}

/// One course section: inline checks in reading order, its FAQ and its quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub inline_checks: Vec<CheckQuestion>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    pub quiz: QuizContent,
}

impl Section {
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, ContentError> {
        let section: Section =
            serde_json::from_reader(reader).map_err(|source| ContentError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        section.validate()?;
        Ok(section)
    }

    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let file = File::open(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        let invalid = |reason: String| ContentError::InvalidSection {
            id: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id is empty".into()));
        }
        if self.title.trim().is_empty() {
            return Err(invalid("title is empty".into()));
        }
        for check in &self.inline_checks {
            check.validate()?;
        }
        for (i, faq) in self.faqs.iter().enumerate() {
            if faq.question.trim().is_empty() || faq.answer.trim().is_empty() {
                return Err(invalid(format!("FAQ {} has an empty question or answer", i + 1)));
            }
        }
        if self.quiz.questions.is_empty() {
            return Err(invalid("quiz has no questions".into()));
        }
        if let Some(mark) = self.quiz.passing_score {
            if mark > 100 {
                return Err(invalid(format!("passing score {} is above 100", mark)));
            }
        }
        for question in &self.quiz.questions {
            question.validate()?;
        }
        Ok(())
    }

    /// Inline check widget for the check at `position`, if any.
    pub fn inline_check(&self, position: usize) -> Option<InlineCheck> {
        self.inline_checks.get(position).cloned().map(InlineCheck::new)
    }

    /// A fresh run of this section's quiz.
    pub fn start_quiz(&self) -> QuizRun {
        QuizRun::new(
            self.quiz.title.clone(),
            self.quiz.questions.clone(),
            self.quiz.passing_score,
        )
    }
}

/// Every section the bot can serve, in file-name order.
#[derive(Debug, Clone, Default)]
pub struct Library {
    sections: Vec<Section>,
}

impl Library {
    pub fn from_sections(sections: Vec<Section>) -> Result<Self, ContentError> {
        let mut seen = HashSet::new();
        for section in &sections {
            section.validate()?;
            if !seen.insert(section.id.as_str()) {
                return Err(ContentError::DuplicateSection(section.id.clone()));
            }
        }
        Ok(Self { sections })
    }

    /// Loads and validates every `*.json` file directly under `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, ContentError> {
        let io_err = |source| ContentError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(io_err)?;
        paths.retain(|p| p.is_file() && p.extension().map_or(false, |ext| ext == "json"));
        paths.sort();

        if paths.is_empty() {
            return Err(ContentError::Empty(dir.to_path_buf()));
        }

        let mut sections = Vec::with_capacity(paths.len());
        for path in &paths {
            let section = Section::from_path(path)?;
            debug!("loaded section {} from {}", section.id, path.display());
            sections.push(section);
        }

        let library = Self::from_sections(sections)?;
        info!("loaded {} sections from {}", library.len(), dir.display());
        Ok(library)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Section> {
        let title = title.trim();
        self.sections.iter().find(|s| s.title == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION: &str = r#"{
        "id": "jointing-glanding",
        "title": "Jointing and Glanding Techniques",
        "inlineChecks": [
            {
                "id": "gland-outdoor",
                "question": "Which gland type is designed for outdoor SWA cable?",
                "options": ["BW gland", "CW gland"],
                "correctIndex": 1,
                "explanation": "CW glands provide weatherproof sealing."
            },
            {
                "id": "resin-reopen",
                "question": "Resin-filled joints can be reopened for maintenance.",
                "correctAnswer": false,
                "explanation": "Once cured they are permanent."
            }
        ],
        "faqs": [
            { "q": "Do I always need an earth tag?", "a": "Armour must be effectively bonded." }
        ],
        "quiz": {
            "title": "Knowledge Check",
            "passingScore": 75,
            "questions": [
                {
                    "id": 1,
                    "question": "What must be tested after installing an SWA gland?",
                    "options": ["Voltage rating", "Earth continuity"],
                    "correctAnswer": 1,
                    "explanation": "Verify continuity between the armour and the earthing system."
                }
            ]
        }
    }"#;

    fn parse(json: &str) -> Result<Section, ContentError> {
        Section::from_reader(json.as_bytes(), Path::new("test.json"))
    }

    #[test]
    fn parses_section_with_mixed_shapes() {
        let section = parse(SECTION).unwrap();
        assert_eq!(section.inline_checks.len(), 2);
        assert_eq!(section.faqs[0].question, "Do I always need an earth tag?");
        assert_eq!(section.quiz.passing_score, Some(75));

        let run = section.start_quiz();
        assert_eq!(run.total(), 1);
        assert_eq!(run.title(), "Knowledge Check");
        assert!(section.inline_check(1).is_some());
        assert!(section.inline_check(2).is_none());
    }

    #[test]
    fn rejects_empty_quiz() {
        let mut section = parse(SECTION).unwrap();
        section.quiz.questions.clear();
        let err = section.validate().unwrap_err();
        assert!(err.to_string().contains("no questions"));
    }

    #[test]
    fn rejects_passing_score_above_100() {
        let mut section = parse(SECTION).unwrap();
        section.quiz.passing_score = Some(120);
        assert!(section.validate().is_err());
    }

    #[test]
    fn reports_file_on_parse_error() {
        let err = parse("{ not json").unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
        assert!(err.to_string().contains("test.json"));
    }

    #[test]
    fn invalid_question_fails_the_section() {
        let broken = SECTION.replace(r#""correctAnswer": 1"#, r#""correctAnswer": 4"#);
        let err = parse(&broken).unwrap_err();
        assert!(matches!(err, ContentError::InvalidQuestion { .. }));
    }

    #[test]
    fn library_rejects_duplicate_ids() {
        let section = parse(SECTION).unwrap();
        let err = Library::from_sections(vec![section.clone(), section]).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateSection(id) if id == "jointing-glanding"));
    }

    #[test]
    fn library_loads_json_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let second = SECTION
            .replace("jointing-glanding", "b-section")
            .replace("Jointing and Glanding Techniques", "Second");
        let first = SECTION
            .replace("jointing-glanding", "a-section")
            .replace("Jointing and Glanding Techniques", "First");
        fs::write(dir.path().join("02.json"), second).unwrap();
        fs::write(dir.path().join("01.json"), first).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let library = Library::load_dir(dir.path()).unwrap();
        let ids: Vec<&str> = library.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a-section", "b-section"]);
        assert_eq!(library.find_by_title("Second").map(|s| s.id.as_str()), Some("b-section"));
        assert!(library.get("missing").is_none());
    }

    #[test]
    fn library_rejects_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = Library::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ContentError::Empty(_)));
    }
}
