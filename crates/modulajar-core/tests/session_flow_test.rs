//! Integration tests for a full form submission: validation gate, prompt
//! builder, generator call and the recorded outcome.

use modulajar_core::generation::GenerationError;
use modulajar_core::input::{ProfileDimension, ProfileSelection, RequiredField};
use modulajar_core::prompt::{ACTIVITIES_SECTION, IDENTITY_SECTION, SIGNATURE_SECTION, section_text};
use modulajar_core::{ExportFormat, Session, SessionError};
use modulajar_test_utils::{ScriptedGenerator, minimal_input, sample_input, sample_module};

#[tokio::test]
async fn valid_submission_builds_prompt_and_records_module() {
    let input = minimal_input();
    let markdown = sample_module(&input);
    let generator = ScriptedGenerator::replying(markdown.clone());
    let mut session = Session::with_input(input);

    let module = session.submit(&generator).await.unwrap();
    assert_eq!(module.content, markdown);

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.contains("Persamaan Linear"));
    assert!(prompt.contains("Problem Based Learning (PBL)"));

    let identity = section_text(prompt, IDENTITY_SECTION).unwrap();
    assert!(!identity.contains("Budi"));
    assert!(!identity.contains("Siti"));
    assert!(prompt.contains("Budi"));
    assert!(prompt.contains("Siti"));

    assert!(!session.is_busy());
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn empty_dpl_is_rejected_without_calling_generator() {
    let mut input = minimal_input();
    input.selected_dpl = ProfileSelection::new();
    let generator = ScriptedGenerator::replying("# tidak dipakai");
    let mut session = Session::with_input(input);

    let err = session.submit(&generator).await.unwrap_err();
    let SessionError::Validation(validation) = &err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(validation.missing_dpl);
    assert!(validation.missing.is_empty());
    assert!(err.user_message().contains("Dimensi Profil Lulusan"));
    assert_eq!(generator.calls(), 0);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn each_blank_required_field_blocks_generation() {
    for field in RequiredField::ALL {
        let mut input = minimal_input();
        let slot = match field {
            RequiredField::SchoolName => &mut input.school_name,
            RequiredField::TeacherName => &mut input.teacher_name,
            RequiredField::PrincipalName => &mut input.principal_name,
            RequiredField::Subject => &mut input.subject,
            RequiredField::CoreTopic => &mut input.core_topic,
        };
        *slot = "   ".into();

        let generator = ScriptedGenerator::replying("# tidak dipakai");
        let mut session = Session::with_input(input);
        let err = session.submit(&generator).await.unwrap_err();
        assert!(
            err.user_message().contains(field.label()),
            "message for {field:?}: {}",
            err.user_message()
        );
        assert_eq!(generator.calls(), 0);
    }
}

#[tokio::test]
async fn empty_generation_reports_failure_and_records_nothing() {
    let generator = ScriptedGenerator::replying("");
    let mut session = Session::with_input(minimal_input());

    let err = session.submit(&generator).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Generation(GenerationError::EmptyResponse)
    ));
    assert_eq!(
        session.last_error(),
        Some("Gagal menghasilkan modul. Silakan coba lagi.")
    );
    assert!(session.generated().is_none());
    assert!(matches!(
        session.export(ExportFormat::Markdown),
        Err(SessionError::NothingGenerated)
    ));
}

#[tokio::test]
async fn transport_failure_reports_connection_message() {
    let generator =
        ScriptedGenerator::new([Err(GenerationError::Transport("connection refused".into()))]);
    let mut session = Session::with_input(minimal_input());

    session.submit(&generator).await.unwrap_err();
    assert_eq!(
        session.last_error(),
        Some("Terjadi kesalahan saat menghubungi AI. Periksa koneksi atau API Key Anda.")
    );
    assert!(!session.is_busy());
}

#[tokio::test]
async fn resubmission_after_failure_succeeds() {
    let input = sample_input();
    let markdown = sample_module(&input);
    let generator = ScriptedGenerator::new([
        Err(GenerationError::Rejected {
            status: 503,
            body: "overloaded".into(),
        }),
        Ok(markdown.clone()),
    ]);
    let mut session = Session::with_input(input);

    session.submit(&generator).await.unwrap_err();
    assert!(session.last_error().is_some());

    session.submit(&generator).await.unwrap();
    assert!(session.last_error().is_none());
    assert_eq!(session.generated().unwrap().content, markdown);
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn signature_and_activity_sections_follow_the_input() {
    let input = sample_input();
    let generator = ScriptedGenerator::replying(sample_module(&input));
    let mut session = Session::with_input(input.clone());
    session.submit(&generator).await.unwrap();

    let prompt = &generator.prompts()[0];
    let signature = section_text(prompt, SIGNATURE_SECTION).unwrap();
    for value in [
        &input.teacher_name,
        &input.teacher_nip,
        &input.principal_name,
        &input.principal_nip,
    ] {
        assert!(signature.contains(value.as_str()), "signature missing {value}");
    }
    let activities = section_text(prompt, ACTIVITIES_SECTION).unwrap();
    assert!(activities.contains(input.teaching_model.label()));
}

#[tokio::test]
async fn toggled_dpl_order_reaches_the_prompt() {
    let mut session = Session::with_input(minimal_input());
    let dpl = &mut session.input_mut().selected_dpl;
    dpl.toggle(ProfileDimension::Collaboration);
    dpl.toggle(ProfileDimension::Creativity);
    dpl.toggle(ProfileDimension::Creativity);

    let generator = ScriptedGenerator::replying("# Modul");
    session.submit(&generator).await.unwrap();
    assert!(generator.prompts()[0].contains("Kolaborasi, Kreativitas"));
}
