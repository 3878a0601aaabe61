pub const DEFAULT_VOICE: &str = "zh-CN-XiaoxiaoMultilingualNeural";
pub const DEFAULT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

/// One synthesis call, built from either the query or the JSON form of `/api/tts`.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    /// Percent offset from the voice's default rate.
    pub rate: f64,
    /// Percent offset from the voice's default pitch.
    pub pitch: f64,
    /// Value for `X-Microsoft-OutputFormat`.
    pub format: String,
    pub download: bool,
}

impl SynthesisRequest {
    pub fn to_ssml(&self) -> String {
        build_ssml(&self.text, &self.voice, self.rate, self.pitch)
    }
}

/// Wrap `text` in an SSML document for `voice`.
///
/// `text` is inserted as-is, so callers may embed their own SSML elements.
pub fn build_ssml(text: &str, voice: &str, rate: f64, pitch: f64) -> String {
    format!(
        r#"<speak xmlns="http://www.w3.org/2001/10/synthesis" xmlns:mstts="http://www.w3.org/2001/mstts" version="1.0" xml:lang="zh-CN">
    <voice name="{voice}">
        <mstts:express-as style="general" styledegree="1.0" role="default">
            <prosody rate="{rate}%" pitch="{pitch}%" volume="50">{text}</prosody>
        </mstts:express-as>
    </voice>
</speak>"#,
        voice = voice,
        rate = format_percent(rate),
        pitch = format_percent(pitch),
        text = text,
    )
}

/// `10` rather than `10.0`, and never `-0`.
fn format_percent(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
