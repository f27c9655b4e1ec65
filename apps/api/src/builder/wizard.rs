//! The assembly wizard as a pure state machine: three ordered stages,
//! forward-only in the normal flow, with explicit back transitions. No IO —
//! callers load records and persist the outcome.

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::portfolio::PortfolioContent;
use crate::models::resume::{ExperienceEntry, ParsedResume};
use crate::models::template::Template;
use crate::slug::generate_subdomain;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    SelectResume,
    SelectTemplate,
    Customize,
}

#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("Resume has not been parsed yet")]
    ResumeNotParsed,

    #[error("Operation not valid at this step")]
    WrongStep,

    #[error("Portfolio {0} must not be empty")]
    MissingField(&'static str),
}

/// Everything save needs, produced only by a completed wizard.
#[derive(Debug, Clone)]
pub struct SavePlan {
    pub resume_id: Uuid,
    pub template_id: Uuid,
    /// The chosen template's `template_config`, copied verbatim.
    pub theme_config: Value,
    pub content: PortfolioContent,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    step: WizardStep,
    resume: Option<(Uuid, ParsedResume)>,
    template: Option<Template>,
    draft: Option<PortfolioContent>,
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::SelectResume,
            resume: None,
            template: None,
            draft: None,
        }
    }

    /// Deep-link entry: a known resume reference (e.g. straight from the
    /// ingestion flow) pre-selects the resume and skips to template selection.
    pub fn with_resume(resume_id: Uuid, parsed: Option<ParsedResume>) -> Result<Self, WizardError> {
        let mut wizard = Self::new();
        wizard.select_resume(resume_id, parsed)?;
        Ok(wizard)
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> Option<&PortfolioContent> {
        self.draft.as_ref()
    }

    /// Stage 1: only resumes with parsed content can seed a portfolio.
    pub fn select_resume(
        &mut self,
        resume_id: Uuid,
        parsed: Option<ParsedResume>,
    ) -> Result<(), WizardError> {
        if self.step != WizardStep::SelectResume {
            return Err(WizardError::WrongStep);
        }
        let parsed = parsed.ok_or(WizardError::ResumeNotParsed)?;
        self.resume = Some((resume_id, parsed));
        self.step = WizardStep::SelectTemplate;
        Ok(())
    }

    /// Stage 2: picking a template seeds the draft from the parsed resume.
    pub fn select_template(&mut self, template: Template) -> Result<(), WizardError> {
        if self.step != WizardStep::SelectTemplate {
            return Err(WizardError::WrongStep);
        }
        let (_, parsed) = self.resume.as_ref().ok_or(WizardError::WrongStep)?;
        self.draft = Some(seed_draft(parsed));
        self.template = Some(template);
        self.step = WizardStep::Customize;
        Ok(())
    }

    /// Stage 3 edits replace the draft wholesale; partial edits are the
    /// caller's job to assemble (see `edit_experience`).
    pub fn replace_draft(&mut self, draft: PortfolioContent) -> Result<(), WizardError> {
        if self.step != WizardStep::Customize {
            return Err(WizardError::WrongStep);
        }
        self.draft = Some(draft);
        Ok(())
    }

    /// Explicit back transition; a no-op at the first stage.
    pub fn back(&mut self) {
        self.step = match self.step {
            WizardStep::SelectResume | WizardStep::SelectTemplate => WizardStep::SelectResume,
            WizardStep::Customize => WizardStep::SelectTemplate,
        };
    }

    /// Confirms the wizard: validates the draft and yields the save plan.
    pub fn finish(self) -> Result<SavePlan, WizardError> {
        if self.step != WizardStep::Customize {
            return Err(WizardError::WrongStep);
        }
        let (resume_id, _) = self.resume.ok_or(WizardError::WrongStep)?;
        let template = self.template.ok_or(WizardError::WrongStep)?;
        let content = self.draft.ok_or(WizardError::WrongStep)?;

        if content.title.trim().is_empty() {
            return Err(WizardError::MissingField("title"));
        }
        if content.subdomain.trim().is_empty() {
            return Err(WizardError::MissingField("subdomain"));
        }

        Ok(SavePlan {
            resume_id,
            template_id: template.id,
            theme_config: template.template_config,
            content,
        })
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-seeds the customization draft from parsed resume content. Fields are
/// copied by value; a portfolio never observes later resume edits.
pub fn seed_draft(parsed: &ParsedResume) -> PortfolioContent {
    let name = parsed
        .personal_info
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    PortfolioContent {
        title: format!("{} Portfolio", name.unwrap_or("Professional")),
        subdomain: generate_subdomain(name.unwrap_or("portfolio")),
        personal_info: parsed.personal_info.clone(),
        summary: parsed.summary.clone(),
        experience: parsed.experience.clone(),
        education: parsed.education.clone(),
        skills: parsed.skills.clone(),
        projects: parsed.projects.clone(),
        certifications: parsed.certifications.clone(),
    }
}

/// Rebuilds the experience array with one index replaced, leaving every other
/// entry untouched. Out-of-range indexes return the draft unchanged.
pub fn edit_experience(
    draft: &PortfolioContent,
    index: usize,
    entry: ExperienceEntry,
) -> PortfolioContent {
    let mut edited = draft.clone();
    if let Some(slot) = edited.experience.get_mut(index) {
        *slot = entry;
    }
    edited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::PersonalInfo;
    use serde_json::json;

    fn parsed_jane() -> ParsedResume {
        ParsedResume {
            personal_info: PersonalInfo {
                name: Some("Jane Doe".into()),
                ..Default::default()
            },
            skills: vec!["Go".into(), "Rust".into()],
            experience: vec![
                experience("Engineer I"),
                experience("Engineer II"),
                experience("Staff Engineer"),
            ],
            ..Default::default()
        }
    }

    fn experience(title: &str) -> ExperienceEntry {
        ExperienceEntry {
            title: title.into(),
            company: "Acme".into(),
            duration: "2020".into(),
            description: "Work".into(),
            achievements: vec![],
        }
    }

    fn template() -> Template {
        Template {
            id: Uuid::new_v4(),
            name: "Minimal".into(),
            description: String::new(),
            category: "minimal".into(),
            is_premium: false,
            template_config: json!({"colors": {"primary": "#111827"}}),
        }
    }

    fn wizard_at_customize() -> Wizard {
        let mut wizard = Wizard::new();
        wizard
            .select_resume(Uuid::new_v4(), Some(parsed_jane()))
            .unwrap();
        wizard.select_template(template()).unwrap();
        wizard
    }

    #[test]
    fn test_seed_uses_name_for_title_and_copies_by_value() {
        let mut parsed = parsed_jane();
        let draft = seed_draft(&parsed);

        assert_eq!(draft.title, "Jane Doe Portfolio");
        assert_eq!(draft.skills, vec!["Go", "Rust"]);

        // Copied by value: mutating the source must not reach the draft.
        parsed.skills.push("COBOL".into());
        assert_eq!(draft.skills, vec!["Go", "Rust"]);
    }

    #[test]
    fn test_seed_defaults_when_name_is_missing() {
        let draft = seed_draft(&ParsedResume::default());
        assert_eq!(draft.title, "Professional Portfolio");
        assert!(draft.subdomain.starts_with("portfolio-"));
        assert!(draft.experience.is_empty());
    }

    #[test]
    fn test_seed_subdomain_is_slug_plus_suffix() {
        let draft = seed_draft(&parsed_jane());
        let (base, suffix) = draft.subdomain.rsplit_once('-').unwrap();
        assert_eq!(base, "jane-doe");
        assert_eq!(suffix.len(), 4);
    }

    #[test]
    fn test_select_resume_requires_parsed_data() {
        let mut wizard = Wizard::new();
        assert_eq!(
            wizard.select_resume(Uuid::new_v4(), None),
            Err(WizardError::ResumeNotParsed)
        );
        assert_eq!(wizard.step(), WizardStep::SelectResume);
    }

    #[test]
    fn test_forward_transitions() {
        let mut wizard = Wizard::new();
        wizard
            .select_resume(Uuid::new_v4(), Some(parsed_jane()))
            .unwrap();
        assert_eq!(wizard.step(), WizardStep::SelectTemplate);
        wizard.select_template(template()).unwrap();
        assert_eq!(wizard.step(), WizardStep::Customize);
        assert!(wizard.draft().is_some());
    }

    #[test]
    fn test_deep_link_skips_resume_selection() {
        let wizard = Wizard::with_resume(Uuid::new_v4(), Some(parsed_jane())).unwrap();
        assert_eq!(wizard.step(), WizardStep::SelectTemplate);
    }

    #[test]
    fn test_out_of_order_operations_fail() {
        let mut wizard = Wizard::new();
        assert_eq!(
            wizard.select_template(template()),
            Err(WizardError::WrongStep)
        );
        assert_eq!(
            wizard.replace_draft(PortfolioContent::default()),
            Err(WizardError::WrongStep)
        );
        assert!(matches!(
            Wizard::new().finish(),
            Err(WizardError::WrongStep)
        ));
    }

    #[test]
    fn test_back_transitions() {
        let mut wizard = wizard_at_customize();
        wizard.back();
        assert_eq!(wizard.step(), WizardStep::SelectTemplate);
        wizard.back();
        assert_eq!(wizard.step(), WizardStep::SelectResume);
        wizard.back(); // no-op at the first stage
        assert_eq!(wizard.step(), WizardStep::SelectResume);
    }

    #[test]
    fn test_edit_experience_replaces_only_that_index() {
        let draft = seed_draft(&parsed_jane());
        let mut replacement = draft.experience[1].clone();
        replacement.title = "Principal Engineer".into();

        let edited = edit_experience(&draft, 1, replacement);

        assert_eq!(edited.experience[0], draft.experience[0]);
        assert_eq!(edited.experience[2], draft.experience[2]);
        assert_eq!(edited.experience[1].title, "Principal Engineer");
        assert_eq!(edited.experience[1].company, draft.experience[1].company);
    }

    #[test]
    fn test_edit_experience_out_of_range_is_noop() {
        let draft = seed_draft(&parsed_jane());
        let edited = edit_experience(&draft, 99, experience("Ghost"));
        assert_eq!(edited, draft);
    }

    #[test]
    fn test_finish_rejects_empty_title_or_subdomain() {
        let mut wizard = wizard_at_customize();
        let mut draft = wizard.draft().unwrap().clone();
        draft.title = "  ".into();
        wizard.replace_draft(draft).unwrap();
        assert!(matches!(
            wizard.clone().finish(),
            Err(WizardError::MissingField("title"))
        ));

        let mut draft = wizard.draft().unwrap().clone();
        draft.title = "Jane Doe Portfolio".into();
        draft.subdomain = String::new();
        wizard.replace_draft(draft).unwrap();
        assert!(matches!(
            wizard.finish(),
            Err(WizardError::MissingField("subdomain"))
        ));
    }

    #[test]
    fn test_finish_copies_theme_config_verbatim() {
        let plan = wizard_at_customize().finish().unwrap();
        assert_eq!(plan.theme_config, json!({"colors": {"primary": "#111827"}}));
        assert_eq!(plan.content.title, "Jane Doe Portfolio");
    }

    #[test]
    fn test_draft_survives_back_and_forward() {
        let mut wizard = wizard_at_customize();
        let mut draft = wizard.draft().unwrap().clone();
        draft.summary = "Edited summary".into();
        wizard.replace_draft(draft).unwrap();

        wizard.back();
        wizard.select_template(template()).unwrap();
        // Re-selecting a template reseeds the draft from the resume.
        assert_eq!(wizard.draft().unwrap().summary, "");
    }
}
