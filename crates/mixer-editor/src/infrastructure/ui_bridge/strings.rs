//! Localized user-facing texts.
//!
//! Every sentence a user can see is a [`Message`] variant; [`Message::render`]
//! turns it into text for one [`Locale`].  Adding a language means adding a
//! `Locale` variant and one more `match` arm per message, nothing else.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use mixer_core::{NoiseReduction, SliderIndex};
use thiserror::Error;

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Turkish,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported locale {0:?}: expected en or tr")]
pub struct UnknownLocale(String);

impl Locale {
    /// Picks the locale from a `LANG`-style environment value
    /// (`tr_TR.UTF-8`, `en_US`, `C`), falling back to English.
    pub fn from_system(lang: Option<&str>) -> Self {
        lang.and_then(|value| value.parse().ok()).unwrap_or_default()
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Turkish => "tr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    /// Accepts `en`, `tr`, the English language names and `LANG` values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let language = lowered
            .split(|c| c == '_' || c == '-' || c == '.')
            .next()
            .unwrap_or_default();
        match language {
            "en" | "english" => Ok(Self::English),
            "tr" | "turkish" => Ok(Self::Turkish),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

/// A user-facing text with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // ── Helper ────────────────────────────────────────────────────────────────
    HelperNotFound { path: PathBuf },
    HelperLaunchFailed { path: PathBuf, reason: String },
    HelperStarted { pid: u32 },
    HelperClosed,
    NoRunningHelper,
    HelperTerminationRefused { name: String },

    // ── Settings ──────────────────────────────────────────────────────────────
    ComPortSet { port: String },
    ComPortNotSpecified,
    ComPortNotDetected { port: String },
    BaudRateUpdated,
    InvalidBaudRate,
    InvertSlidersUpdated,
    NoiseReductionUpdated,
    UnknownNoiseReduction { value: String },
    SliderAssigned { index: SliderIndex, target: String },
    MasterSliderSet { index: SliderIndex },
    SharedMaster,
    TargetNotSpecified,
    SliderIndexGap { index: SliderIndex, next: SliderIndex },

    // ── Configuration file ────────────────────────────────────────────────────
    ConfigNotFound { path: PathBuf },
    ConfigInvalid { path: PathBuf, reason: String },
    SaveFailed { reason: String },

    // ── Change events ─────────────────────────────────────────────────────────
    SliderRemoved { index: SliderIndex },
    ComPortChanged { port: Option<String> },
    BaudRateChanged { rate: u32 },
    InvertSlidersChanged { invert: bool },
    NoiseReductionChanged { level: NoiseReduction },
    HelperStopped { pids: Vec<u32> },

    // ── Labels ────────────────────────────────────────────────────────────────
    WindowTitle,
    SliderLabel { index: SliderIndex },
    ComPortLabel,
    BaudRateLabel,
    InvertSlidersLabel,
    NoiseReductionLabel,
    NotSet,
}

impl Message {
    pub fn render(&self, locale: Locale) -> String {
        match locale {
            Locale::English => self.english(),
            Locale::Turkish => self.turkish(),
        }
    }

    fn english(&self) -> String {
        match self {
            Self::HelperNotFound { path } => format!(
                "{} app not found on the path. Make sure you are in the same dir with Deej.exe.",
                path.display()
            ),
            Self::HelperLaunchFailed { path, reason } => {
                format!("{} could not be started: {reason}", path.display())
            }
            Self::HelperStarted { pid } => format!("Deej app started (PID {pid})"),
            Self::HelperClosed => "Deej app is closed".into(),
            Self::NoRunningHelper => "No running Deej apps found!".into(),
            Self::HelperTerminationRefused { name } => {
                format!("{name} is running but could not be closed!")
            }
            Self::ComPortSet { port } => format!("COM Port set to {port}!"),
            Self::ComPortNotSpecified => "COM Port not specified!".into(),
            Self::ComPortNotDetected { port } => {
                format!("{port} is not among the detected serial ports.")
            }
            Self::BaudRateUpdated => "Baud rate updated successfully!".into(),
            Self::InvalidBaudRate => "Invalid baud rate value!".into(),
            Self::InvertSlidersUpdated => "Invert sliders setting updated successfully!".into(),
            Self::NoiseReductionUpdated => "Noise reduction setting updated successfully!".into(),
            Self::UnknownNoiseReduction { value } => {
                format!("Unknown noise reduction level {value:?}! Use low, medium or high.")
            }
            Self::SliderAssigned { index, target } => format!("Slider {index} set to {target}!"),
            Self::MasterSliderSet { index } => {
                format!("Slider {index} now controls the master volume!")
            }
            Self::SharedMaster => "More than one slider controls the master volume.".into(),
            Self::TargetNotSpecified => "Target not specified!".into(),
            Self::SliderIndexGap { index, next } => {
                format!("Slider {index} cannot be added, the next free slider is {next}.")
            }
            Self::ConfigNotFound { path } => {
                format!("Configuration file {} not found!", path.display())
            }
            Self::ConfigInvalid { path, reason } => {
                format!("Configuration file {} could not be read: {reason}", path.display())
            }
            Self::SaveFailed { reason } => format!("Settings could not be saved: {reason}"),
            Self::SliderRemoved { index } => format!("Slider {index} removed"),
            Self::ComPortChanged { port: Some(port) } => format!("COM Port is now {port}"),
            Self::ComPortChanged { port: None } => "COM Port cleared".into(),
            Self::BaudRateChanged { rate } => format!("Baud rate is now {rate}"),
            Self::InvertSlidersChanged { invert: true } => "Sliders are inverted".into(),
            Self::InvertSlidersChanged { invert: false } => "Sliders are not inverted".into(),
            Self::NoiseReductionChanged { level } => format!("Noise reduction is now {level}"),
            Self::HelperStopped { pids } => format!("Deej app is closed (PID {})", join(pids)),
            Self::WindowTitle => "CrowdDaemon Audio Control Program".into(),
            Self::SliderLabel { index } => format!("Slider {index}:"),
            Self::ComPortLabel => "COM Port:".into(),
            Self::BaudRateLabel => "Baud Rate:".into(),
            Self::InvertSlidersLabel => "Invert Sliders:".into(),
            Self::NoiseReductionLabel => "Noise Reduction:".into(),
            Self::NotSet => "(not set)".into(),
        }
    }

    fn turkish(&self) -> String {
        match self {
            Self::HelperNotFound { path } => format!(
                "{} bulunamadı. Deej.exe ile aynı klasörde olduğunuzdan emin olun.",
                path.display()
            ),
            Self::HelperLaunchFailed { path, reason } => {
                format!("{} başlatılamadı: {reason}", path.display())
            }
            Self::HelperStarted { pid } => format!("Deej uygulaması başlatıldı (PID {pid})"),
            Self::HelperClosed => "Deej uygulaması kapatıldı".into(),
            Self::NoRunningHelper => "Çalışan Deej uygulaması bulunamadı!".into(),
            Self::HelperTerminationRefused { name } => {
                format!("{name} çalışıyor ancak kapatılamadı!")
            }
            Self::ComPortSet { port } => format!("COM Portu {port} olarak ayarlandı!"),
            Self::ComPortNotSpecified => "COM Portu belirtilmedi!".into(),
            Self::ComPortNotDetected { port } => {
                format!("{port} algılanan seri portlar arasında değil.")
            }
            Self::BaudRateUpdated => "Baud hızı başarıyla güncellendi!".into(),
            Self::InvalidBaudRate => "Geçersiz baud hızı değeri!".into(),
            Self::InvertSlidersUpdated => {
                "Sürgüleri ters çevirme ayarı başarıyla güncellendi!".into()
            }
            Self::NoiseReductionUpdated => "Gürültü azaltma ayarı başarıyla güncellendi!".into(),
            Self::UnknownNoiseReduction { value } => format!(
                "Bilinmeyen gürültü azaltma seviyesi {value:?}! low, medium veya high kullanın."
            ),
            Self::SliderAssigned { index, target } => {
                format!("Sürgü {index}, {target} olarak ayarlandı!")
            }
            Self::MasterSliderSet { index } => {
                format!("Sürgü {index} artık ana ses seviyesini kontrol ediyor!")
            }
            Self::SharedMaster => "Birden fazla sürgü ana ses seviyesini kontrol ediyor.".into(),
            Self::TargetNotSpecified => "Hedef belirtilmedi!".into(),
            Self::SliderIndexGap { index, next } => {
                format!("Sürgü {index} eklenemez, sıradaki boş sürgü {next}.")
            }
            Self::ConfigNotFound { path } => {
                format!("{} yapılandırma dosyası bulunamadı!", path.display())
            }
            Self::ConfigInvalid { path, reason } => {
                format!("{} yapılandırma dosyası okunamadı: {reason}", path.display())
            }
            Self::SaveFailed { reason } => format!("Ayarlar kaydedilemedi: {reason}"),
            Self::SliderRemoved { index } => format!("Sürgü {index} kaldırıldı"),
            Self::ComPortChanged { port: Some(port) } => format!("COM Portu artık {port}"),
            Self::ComPortChanged { port: None } => "COM Portu temizlendi".into(),
            Self::BaudRateChanged { rate } => format!("Baud hızı artık {rate}"),
            Self::InvertSlidersChanged { invert: true } => "Sürgüler ters çevrildi".into(),
            Self::InvertSlidersChanged { invert: false } => "Sürgüler ters çevrilmedi".into(),
            Self::NoiseReductionChanged { level } => {
                format!("Gürültü azaltma artık {level}")
            }
            Self::HelperStopped { pids } => {
                format!("Deej uygulaması kapatıldı (PID {})", join(pids))
            }
            Self::WindowTitle => "CrowdDaemon Ses Kontrol Programı".into(),
            Self::SliderLabel { index } => format!("Sürgü {index}:"),
            Self::ComPortLabel => "COM Portu:".into(),
            Self::BaudRateLabel => "Baud Hızı:".into(),
            Self::InvertSlidersLabel => "Sürgüleri Ters Çevir:".into(),
            Self::NoiseReductionLabel => "Gürültü Azaltma:".into(),
            Self::NotSet => "(ayarlanmadı)".into(),
        }
    }
}

fn join(pids: &[u32]) -> String {
    pids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
