use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tonewave_core::bitmap::{load_grayscale, save_grayscale};
use tonewave_core::wav::{read_wav, write_wav};
use tonewave_core::{BfskCodec, MorseCodec, SstvCodec, ToneCodec, WaveFormat};

#[derive(Parser)]
#[command(name = "tonewave")]
#[command(about = "Send text, Morse and small images as audio tones")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Binary FSK: 8-bit ASCII, 300 Hz for 0 and 1000 Hz for 1
    Bfsk {
        #[command(subcommand)]
        action: TextAction,
    },

    /// On/off keyed Morse code at 300 Hz
    Morse {
        #[command(subcommand)]
        action: TextAction,
    },

    /// 160x120 black and white scan-line image
    Image {
        #[command(subcommand)]
        action: ImageAction,
    },
}

#[derive(Subcommand)]
enum TextAction {
    /// Encode a message to a WAV file
    Encode {
        /// Message to send
        message: String,

        /// Seconds per bit (BFSK) or per tick (Morse)
        #[arg(value_name = "DURATION")]
        duration: f64,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,
    },

    /// Decode a WAV file and print the message
    Decode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Also write the message to this file
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ImageAction {
    /// Encode an 8-bit grayscale 160x120 image to a WAV file
    Encode {
        /// Input image
        #[arg(value_name = "INPUT.IMG")]
        input: PathBuf,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,
    },

    /// Decode a WAV file to an image
    Decode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Output image, format from the extension
        #[arg(value_name = "OUTPUT.IMG", default_value = "decoded.png")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Bfsk { action } => match action {
            TextAction::Encode {
                message,
                duration,
                output,
            } => encode_text_command(&BfskCodec::new(duration)?, &message, &output)?,
            TextAction::Decode { input, output } => {
                decode_text_command(&BfskCodec::decoder(), &input, output.as_deref())?
            }
        },
        Commands::Morse { action } => match action {
            TextAction::Encode {
                message,
                duration,
                output,
            } => encode_text_command(&MorseCodec::new(duration)?, &message, &output)?,
            TextAction::Decode { input, output } => {
                decode_text_command(&MorseCodec::decoder(), &input, output.as_deref())?
            }
        },
        Commands::Image { action } => match action {
            ImageAction::Encode { input, output } => encode_image_command(&input, &output)?,
            ImageAction::Decode { input, output } => decode_image_command(&input, &output)?,
        },
    }

    Ok(())
}

fn encode_text_command<C>(
    codec: &C,
    message: &str,
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>>
where
    C: ToneCodec<Payload = str>,
{
    let samples = codec.encode(message)?;
    println!(
        "Encoded {} characters to {} audio samples",
        message.chars().count(),
        samples.len()
    );

    write_wav(output_path, &samples, codec.format())?;
    println!("Wrote {}", output_path.display());
    Ok(())
}

fn decode_text_command<C>(
    codec: &C,
    input_path: &Path,
    output_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>>
where
    C: ToneCodec<Decoded = String>,
{
    let samples = read_wav(input_path, codec.format())?;
    println!("Read {} samples from {}", samples.len(), input_path.display());
    log::debug!("expecting mono 16-bit PCM at {} Hz", codec.format().sample_rate);

    let message = codec.decode(&samples)?;
    println!("Decoded message: {}", message);

    if let Some(path) = output_path {
        std::fs::write(path, &message)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn encode_image_command(input_path: &Path, output_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let image = load_grayscale(input_path)?;
    println!(
        "Read {}x{} image from {}",
        image.width(),
        image.height(),
        input_path.display()
    );

    let codec = SstvCodec::new();
    let samples = codec.encode(&image)?;
    println!("Encoded to {} audio samples", samples.len());

    write_wav(output_path, &samples, codec.format())?;
    println!("Wrote {}", output_path.display());
    Ok(())
}

fn decode_image_command(input_path: &Path, output_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = WaveFormat::default();
    let samples = read_wav(input_path, &format)?;
    println!("Read {} samples from {}", samples.len(), input_path.display());

    let image = SstvCodec::with_format(format)?.decode(&samples)?;
    save_grayscale(output_path, &image)?;
    println!("Wrote {}x{} image to {}", image.width(), image.height(), output_path.display());
    Ok(())
}
