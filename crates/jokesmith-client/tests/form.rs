use jokesmith_client::form::{Field, ParameterForm};
use jokesmith_core::error::CoreError;

#[test]
fn form_starts_incomplete() {
    let form = ParameterForm::default();
    assert!(!form.is_complete());
    assert!(matches!(form.to_parameters(), Err(CoreError::MissingParameters)));
}

#[test]
fn presets_snap_to_their_spelling() {
    let mut form = ParameterForm::default();
    form.set(Field::Topic, "animals");
    form.set(Field::Tone, " GOOFY ");
    form.set(Field::Type, "knock-knock");

    let params = form.to_parameters().unwrap();
    assert_eq!(params.topic, "Animals");
    assert_eq!(params.tone, "Goofy");
    assert_eq!(params.kind, "Knock-knock");
    assert_eq!(params.temperature, 0.7);
}

#[test]
fn free_text_is_kept() {
    let mut form = ParameterForm::default();
    form.set(Field::Topic, "Quantum physics");
    assert_eq!(form.topic.as_deref(), Some("Quantum physics"));
}

#[test]
fn blank_input_clears_a_field() {
    let mut form = ParameterForm::default();
    form.set(Field::Tone, "Dark");
    form.set(Field::Tone, "   ");
    assert_eq!(form.tone, None);
}
