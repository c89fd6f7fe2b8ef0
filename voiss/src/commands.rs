//! Client subcommands driving the training and testing workflows

use std::path::PathBuf;

use voiss_client::{
    EntryContext, FileUpload, FishClient, LookupOutcome, ModelInfo, ModelLookup, Submitted, SynthesisForm,
    SynthesisWorkflow, TrainingForm, TrainingWorkflow, testing_link,
};
use voiss_config::ClientConfig;

use crate::args::{ModelArgs, SpeakArgs, TrainArgs};

pub async fn train(config: &ClientConfig, args: &TrainArgs) -> anyhow::Result<()> {
    let mut form = TrainingForm::new();

    form.set_field("title", &args.title)?;
    form.set_field("texts", &args.texts)?;
    form.set_field("visibility", &args.visibility)?;
    form.set_field("train_mode", &args.train_mode)?;
    form.set_field("enhance_audio_quality", if args.no_enhance { "false" } else { "true" })?;
    if let Some(token) = &args.token {
        form.set_field("authorization", token)?;
    }
    if let Some(path) = &args.audio {
        form.set_audio(Some(load_file(path).await?));
    }
    if let Some(path) = &args.cover {
        form.set_cover_image(Some(load_file(path).await?));
    }

    let workflow = TrainingWorkflow::new(FishClient::from_config(config)?);

    match workflow.submit(&form).await {
        Submitted::Succeeded => {}
        Submitted::Skipped => anyhow::bail!("a training submission is already running"),
        Submitted::Rejected | Submitted::Failed => {
            let failure = workflow.error().map(|failure| failure.message).unwrap_or_default();
            anyhow::bail!("{failure}");
        }
    }

    let Some(model) = workflow.model() else {
        anyhow::bail!("training finished without a model record");
    };

    println!("Model created");
    println!("  id:         {}", model.id);
    println!("  title:      {}", model.title);
    println!("  state:      {}", model.state);
    println!("  visibility: {}", model.visibility);
    println!("  train mode: {}", model.train_mode);
    println!("  created at: {}", model.created_at);
    println!("  fish.audio: {}", model.fish_audio_url());
    println!(
        "  test it:    {}",
        testing_link(&config.app_url, &model.id, &form.authorization)
    );

    Ok(())
}

pub async fn speak(config: &ClientConfig, args: SpeakArgs) -> anyhow::Result<()> {
    let mut form = SynthesisForm::new();

    if let Some(link) = &args.link {
        form.apply_entry(&EntryContext::from_link(link));
    }

    let fields = [
        ("model_id", args.model_id.as_deref()),
        ("authorization", args.token.as_deref()),
        ("text", Some(args.text.as_str())),
        ("base_model", args.base_model.as_deref()),
        ("temperature", args.temperature.as_deref()),
        ("top_p", args.top_p.as_deref()),
        ("speed", args.speed.as_deref()),
        ("volume", args.volume.as_deref()),
        ("prosody", args.prosody.as_deref()),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            form.set_field(name, value)?;
        }
    }

    let workflow = SynthesisWorkflow::new(FishClient::from_config(config)?);

    if !form.model_id.trim().is_empty() {
        match workflow.load_model(&mut form).await {
            Ok(LookupOutcome::Loaded(info)) => print_model(&info),
            Ok(LookupOutcome::Skipped | LookupOutcome::Failed) => {
                tracing::info!(model_id = %form.model_id, "continuing without model details");
            }
            Err(err) => tracing::debug!(error = %err, "model not loaded"),
        }
    }

    match workflow.submit(&form).await {
        Submitted::Succeeded => {}
        Submitted::Skipped => anyhow::bail!("a synthesis submission is already running"),
        Submitted::Rejected | Submitted::Failed => {
            let failure = workflow.error().map(|failure| failure.message).unwrap_or_default();
            anyhow::bail!("{failure}");
        }
    }

    let Some(audio) = workflow.audio() else {
        anyhow::bail!("synthesis finished without audio");
    };

    let output = args.output.unwrap_or_else(|| PathBuf::from(audio.file_name()));
    audio
        .save(&output)
        .await
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", output.display()))?;

    println!("Saved {} bytes of {} to {}", audio.bytes.len(), audio.content_type, output.display());

    Ok(())
}

pub async fn model(config: &ClientConfig, args: ModelArgs) -> anyhow::Result<()> {
    let lookup = ModelLookup::new(FishClient::from_config(config)?);

    match lookup.load(&args.id, &args.token.into()).await {
        LookupOutcome::Loaded(info) => {
            print_model(&info);
            Ok(())
        }
        LookupOutcome::Skipped | LookupOutcome::Failed => anyhow::bail!("could not load model {}", args.id),
    }
}

async fn load_file(path: &std::path::Path) -> anyhow::Result<FileUpload> {
    FileUpload::from_path(path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))
}

fn print_model(info: &ModelInfo) {
    println!("Model {}", info.id);
    println!("  title:       {}", info.title);
    println!("  type:        {}", info.kind);
    println!("  description: {}", info.description);
    println!("  author:      {}", info.author.nickname);
}
