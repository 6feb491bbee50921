use std::sync::Arc;
use std::time::{Duration, Instant};

use voiceforge::{
    placeholder::download_filename, platforms::scripted::ScriptedPlatform, Discovery,
    PlaceholderAudio, SpeechPlatform, Voice,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Behaves like a browser that fills its voice list a moment after start-up.
    let platform = Arc::new(ScriptedPlatform::new());
    let late = platform.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        late.set_voices(vec![
            Voice::new("Samantha", "en-US", true),
            Voice::new("Ava (Premium)", "en-US", true),
            Voice::new("Google US English", "en-US", false),
            Voice::new("Daniel", "en-GB", true),
            Voice::new("Thomas", "fr-FR", true),
            Voice::new("Anna", "de-DE", true),
        ]);
    });

    let discovery = Discovery::new(platform.clone())?;

    let start = Instant::now();
    let catalog = discovery.discover().await;
    println!(
        "Catalog ready via {:?} in {:.2?}",
        catalog.source(),
        start.elapsed()
    );

    println!("Languages:");
    for group in catalog.groups().iter() {
        println!("  {:<8} {}", group.language, group.label());
    }

    let language = catalog.default_language().unwrap_or("en-US").to_string();
    println!("Voices for {language}:");
    for option in catalog.voice_options(&language) {
        println!("  {}", option.label);
    }

    let text = "  Hello! This is a preview of the recommended voice.  ";
    let voice = catalog.recommended_voice(&language);
    let utterance = catalog.utterance(text, &language, voice.value(), 1.0, 1.1)?;
    platform.speak_now(&utterance)?;
    println!(
        "Previewed {} characters with {}",
        utterance.text.chars().count(),
        utterance.voice.value()
    );

    let clip = PlaceholderAudio::generate(platform.as_ref(), &utterance)?;
    let path = std::env::temp_dir().join(download_filename(""));
    clip.write_to(&path)?;
    println!(
        "Saved {} placeholder ({}) to {}",
        clip.mime_type(),
        clip.duration_label(),
        path.display()
    );

    Ok(())
}
