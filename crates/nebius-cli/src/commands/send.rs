//! Single-shot send command.

use crate::cli::SendArgs;
use nebius_core::{ChatMessage, ChatOptions};
use nebius_provider::Vendor;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Fragments buffered between the stream relay and stdout.
const STREAM_BUFFER: usize = 64;

/// Send the prompt and print the result.
pub async fn run(
    vendor: Arc<dyn Vendor>,
    args: &SendArgs,
    defaults: &ChatOptions,
) -> anyhow::Result<()> {
    let messages = args.messages();
    let options = args.options(defaults);
    if options.model.is_empty() {
        anyhow::bail!("No model selected. Pass --model or set defaults.model in the config file.");
    }
    tracing::debug!(
        vendor = vendor.name(),
        model = %options.model,
        raw = options.raw,
        stream = args.stream,
        "sending prompt"
    );

    let mut stdout = std::io::stdout();
    if args.stream {
        return stream(vendor, messages, options, &mut stdout).await;
    }

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let result = complete(vendor.as_ref(), &cancel, &messages, &options, &mut stdout).await;
    ctrl_c.abort();
    result
}

/// Non-streaming send; prints the completion text.
pub async fn complete(
    vendor: &dyn Vendor,
    cancel: &CancellationToken,
    messages: &[ChatMessage],
    options: &ChatOptions,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let text = vendor.send(cancel, messages, options).await?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// Streaming send; prints fragments as they arrive.
///
/// The relay leaves the channel open when it fails, so completion is
/// detected from the producer task rather than from channel closure.
pub async fn stream(
    vendor: Arc<dyn Vendor>,
    messages: Vec<ChatMessage>,
    options: ChatOptions,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel(STREAM_BUFFER);
    let mut producer =
        tokio::spawn(async move { vendor.send_stream(&messages, &options, tx).await });

    let outcome = loop {
        tokio::select! {
            fragment = rx.recv() => match fragment {
                Some(fragment) => print_fragment(out, &fragment)?,
                None => break (&mut producer).await?,
            },
            outcome = &mut producer => break outcome?,
        }
    };

    match outcome {
        Ok(()) => {
            while let Some(fragment) = rx.recv().await {
                print_fragment(out, &fragment)?;
            }
            Ok(())
        }
        Err(failure) => {
            let (error, channel) = failure.into_parts();
            drop(channel);
            while let Some(fragment) = rx.recv().await {
                print_fragment(out, &fragment)?;
            }
            Err(error.into())
        }
    }
}

fn print_fragment(out: &mut impl Write, fragment: &str) -> std::io::Result<()> {
    out.write_all(fragment.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{MockVendor, StreamScript};

    fn prompt() -> Vec<ChatMessage> {
        vec![ChatMessage::user("hi")]
    }

    #[tokio::test]
    async fn test_complete_prints_reply() {
        let vendor = MockVendor::new(StreamScript::Complete(vec![]));
        let mut out = Vec::new();
        complete(
            &vendor,
            &CancellationToken::new(),
            &prompt(),
            &ChatOptions::for_model("m"),
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hello from mock!\n");
        assert_eq!(vendor.seen.lock().unwrap()[0].model, "m");
    }

    #[tokio::test]
    async fn test_complete_cancelled() {
        let vendor = MockVendor::new(StreamScript::Complete(vec![]));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut out = Vec::new();
        let err = complete(&vendor, &cancel, &prompt(), &ChatOptions::for_model("m"), &mut out)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cancelled"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_stream_prints_fragments() {
        let vendor = Arc::new(MockVendor::new(StreamScript::Complete(vec!["Hel", "lo"])));
        let mut out = Vec::new();
        stream(vendor, prompt(), ChatOptions::for_model("m"), &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hello\n");
    }

    #[tokio::test]
    async fn test_stream_failure_does_not_hang() {
        let vendor = Arc::new(MockVendor::new(StreamScript::FailAfter(vec!["par", "tial"])));
        let mut out = Vec::new();
        let err = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            stream(vendor, prompt(), ChatOptions::for_model("m"), &mut out),
        )
        .await
        .expect("stream hung on an open channel")
        .unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(String::from_utf8(out).unwrap(), "partial");
    }

    #[tokio::test]
    async fn test_run_requires_model() {
        let vendor: Arc<dyn Vendor> = Arc::new(MockVendor::new(StreamScript::Complete(vec![])));
        let args = SendArgs {
            prompt: "hi".to_string(),
            ..Default::default()
        };
        let err = run(vendor, &args, &ChatOptions::default()).await.unwrap_err();
        assert!(err.to_string().contains("No model selected"));
    }
}
