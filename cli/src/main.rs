use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;

use tonecast_core::{
    AudioSampleSource, Message, Payload, PayloadKind, Recording, ToneCastError, ToneConfig,
    ToneProgram, ToneSink, ToneTransceiver, DEFAULT_TONE_DURATION,
};

const WAV_SAMPLE_RATE: u32 = 44100;
const WAV_AMPLITUDE: f32 = 0.5;

#[derive(Parser)]
#[command(name = "tonecast")]
#[command(about = "Acoustic FSK link for colors, integers, and short strings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DataTypeArg {
    Color,
    Integer,
    String,
}

impl From<DataTypeArg> for PayloadKind {
    fn from(arg: DataTypeArg) -> Self {
        match arg {
            DataTypeArg::Color => PayloadKind::Color,
            DataTypeArg::Integer => PayloadKind::Integer,
            DataTypeArg::String => PayloadKind::Text,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Response,
    Request,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a payload to a WAV tone program
    Encode {
        /// Payload domain
        #[arg(short, long, value_enum)]
        data_type: DataTypeArg,

        /// Payload value: "R,G,B" or "#RRGGBB" for color, a number for
        /// integer, free text for string (unused for request frames)
        #[arg(short, long)]
        value: Option<String>,

        /// Frame kind to emit
        #[arg(short, long, value_enum, default_value = "response")]
        kind: KindArg,

        /// Seconds per tone
        #[arg(short, long, default_value_t = DEFAULT_TONE_DURATION)]
        tone_duration: f64,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,
    },

    /// Print the tone schedule as JSON instead of synthesizing audio
    Schedule {
        #[arg(short, long, value_enum)]
        data_type: DataTypeArg,

        #[arg(short, long)]
        value: Option<String>,

        #[arg(short, long, value_enum, default_value = "response")]
        kind: KindArg,

        #[arg(short, long, default_value_t = DEFAULT_TONE_DURATION)]
        tone_duration: f64,
    },

    /// Decode a dominant-frequency trace (one Hz reading per line)
    Decode {
        /// Payload domain a response frame will be interpreted as
        #[arg(short, long, value_enum)]
        data_type: DataTypeArg,

        /// Wall time the trace covers, in seconds
        #[arg(short, long)]
        elapsed: f64,

        /// Input trace file
        #[arg(value_name = "TRACE.TXT")]
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            data_type,
            value,
            kind,
            tone_duration,
            output,
        } => encode_command(data_type, value.as_deref(), kind, tone_duration, &output)?,
        Commands::Schedule {
            data_type,
            value,
            kind,
            tone_duration,
        } => schedule_command(data_type, value.as_deref(), kind, tone_duration)?,
        Commands::Decode {
            data_type,
            elapsed,
            input,
        } => decode_command(data_type, elapsed, &input)?,
    }

    Ok(())
}

fn build_program(
    data_type: DataTypeArg,
    value: Option<&str>,
    kind: KindArg,
    tone_duration: f64,
) -> Result<ToneProgram, Box<dyn Error>> {
    let transceiver = ToneTransceiver::new(ToneConfig::v2(), tone_duration)?;
    match kind {
        KindArg::Request => Ok(transceiver.request_program(data_type.into())?),
        KindArg::Response => {
            let value = value.ok_or("a response frame needs --value")?;
            let payload = parse_payload(data_type, value)?;
            Ok(transceiver.response_program(&payload)?)
        }
    }
}

fn encode_command(
    data_type: DataTypeArg,
    value: Option<&str>,
    kind: KindArg,
    tone_duration: f64,
    output: &PathBuf,
) -> Result<(), Box<dyn Error>> {
    let program = build_program(data_type, value, kind, tone_duration)?;
    let mut sink = WavToneSink::new(output.clone());
    sink.play(&program)?;

    println!(
        "Encoded {} tones ({:.1}s) to {}",
        program.events.len(),
        program.total_duration(),
        output.display()
    );
    Ok(())
}

#[derive(Serialize)]
struct ScheduleEntry {
    frequency: f64,
    start_offset: f64,
}

#[derive(Serialize)]
struct Schedule {
    tone_duration: f64,
    total_duration: f64,
    tones: Vec<ScheduleEntry>,
}

fn schedule_command(
    data_type: DataTypeArg,
    value: Option<&str>,
    kind: KindArg,
    tone_duration: f64,
) -> Result<(), Box<dyn Error>> {
    let program = build_program(data_type, value, kind, tone_duration)?;
    let schedule = Schedule {
        tone_duration: program.tone_duration,
        total_duration: program.total_duration(),
        tones: program
            .events
            .iter()
            .map(|e| ScheduleEntry {
                frequency: e.frequency,
                start_offset: e.start_offset,
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&schedule)?);
    Ok(())
}

fn decode_command(
    data_type: DataTypeArg,
    elapsed: f64,
    input: &PathBuf,
) -> Result<(), Box<dyn Error>> {
    let transceiver = ToneTransceiver::new(ToneConfig::v2(), DEFAULT_TONE_DURATION)?;
    let mut source = TraceFileSource {
        path: input.clone(),
        elapsed_secs: elapsed,
    };

    match transceiver.receive(data_type.into(), &mut source)? {
        Message::Request(kind) => println!("Received request for {:?} data", kind),
        Message::Response(Payload::Color([r, g, b])) => {
            println!("Received color: R:{} G:{} B:{}", r, g, b)
        }
        Message::Response(Payload::Integer(value)) => println!("Received integer: {}", value),
        Message::Response(Payload::Text(text)) => println!("Received string: {}", text),
    }
    Ok(())
}

fn parse_payload(data_type: DataTypeArg, value: &str) -> Result<Payload, Box<dyn Error>> {
    match data_type {
        DataTypeArg::Color => Ok(Payload::Color(parse_color(value)?)),
        DataTypeArg::Integer => Ok(Payload::Integer(value.trim().parse()?)),
        DataTypeArg::String => Ok(Payload::Text(value.to_string())),
    }
}

/// Accepts "#RRGGBB" hex or a "R,G,B" decimal triple.
fn parse_color(value: &str) -> Result<[u8; 3], Box<dyn Error>> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("bad hex color {:?}", value).into());
        }
        let mut rgb = [0u8; 3];
        for (channel, part) in rgb.iter_mut().zip([&hex[0..2], &hex[2..4], &hex[4..6]]) {
            *channel = u8::from_str_radix(part, 16)?;
        }
        return Ok(rgb);
    }

    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected R,G,B or #RRGGBB, got {:?}", value).into());
    }
    let mut rgb = [0u8; 3];
    for (channel, part) in rgb.iter_mut().zip(parts) {
        *channel = part.parse()?;
    }
    Ok(rgb)
}

/// Renders a tone program as a square wave, the oscillator shape the
/// original hardware link used.
struct WavToneSink {
    path: PathBuf,
}

impl WavToneSink {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ToneSink for WavToneSink {
    fn play(&mut self, program: &ToneProgram) -> tonecast_core::Result<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: WAV_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&self.path, spec)
            .map_err(|e| ToneCastError::Adapter(e.to_string()))?;

        let samples_per_tone = (program.tone_duration * WAV_SAMPLE_RATE as f64).round() as usize;
        let peak = (WAV_AMPLITUDE * i16::MAX as f32) as i16;
        for event in &program.events {
            let period = WAV_SAMPLE_RATE as f64 / event.frequency;
            for n in 0..samples_per_tone {
                let phase = (n as f64 / period).fract();
                let sample = if phase < 0.5 { peak } else { -peak };
                writer
                    .write_sample(sample)
                    .map_err(|e| ToneCastError::Adapter(e.to_string()))?;
            }
        }
        writer
            .finalize()
            .map_err(|e| ToneCastError::Adapter(e.to_string()))
    }
}

/// Reads an analyzer trace: one dominant-frequency reading (Hz) per line,
/// blank lines and `#` comments skipped.
struct TraceFileSource {
    path: PathBuf,
    elapsed_secs: f64,
}

impl AudioSampleSource for TraceFileSource {
    fn capture(&mut self) -> tonecast_core::Result<Recording> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| ToneCastError::Adapter(e.to_string()))?;
        let mut samples = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let freq: f64 = line
                .parse()
                .map_err(|_| ToneCastError::Adapter(format!("bad trace line {:?}", line)))?;
            samples.push(freq);
        }
        log::debug!(
            "read {} trace samples from {}",
            samples.len(),
            self.path.display()
        );
        Ok(Recording {
            samples,
            elapsed_secs: self.elapsed_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_triple() {
        assert_eq!(parse_color("255, 0, 255").unwrap(), [255, 0, 255]);
        assert_eq!(parse_color("1,2,3").unwrap(), [1, 2, 3]);
    }

    #[test]
    fn test_parse_color_hex() {
        assert_eq!(parse_color("#ff00ff").unwrap(), [255, 0, 255]);
        assert_eq!(parse_color("#123456").unwrap(), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_parse_color_rejects_garbage() {
        assert!(parse_color("#ff00").is_err());
        assert!(parse_color("1,2").is_err());
        assert!(parse_color("300,0,0").is_err());
    }
}
