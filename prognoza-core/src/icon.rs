/// Weather condition categories mapped from OpenWeather icon codes
/// See: https://openweathermap.org/weather-conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    ClearDay,
    ClearNight,
    PartlyCloudy,
    Cloudy,
    Overcast,
    Drizzle,
    RainDay,
    RainNight,
    Thunderstorm,
    Snow,
    Fog,
    Unknown,
}

impl WeatherIcon {
    pub fn from_code(code: &str) -> Self {
        match code {
            "01d" => Self::ClearDay,
            "01n" => Self::ClearNight,
            "02d" | "02n" => Self::PartlyCloudy,
            "03d" | "03n" => Self::Cloudy,
            "04d" | "04n" => Self::Overcast,
            "09d" | "09n" => Self::Drizzle,
            "10d" => Self::RainDay,
            "10n" => Self::RainNight,
            "11d" | "11n" => Self::Thunderstorm,
            "13d" | "13n" => Self::Snow,
            "50d" | "50n" => Self::Fog,
            _ => Self::Unknown,
        }
    }

    /// Glyph used by the terminal front end
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::ClearDay => "☀",
            Self::ClearNight => "☾",
            Self::PartlyCloudy => "⛅",
            Self::Cloudy | Self::Overcast => "☁",
            Self::Drizzle | Self::RainDay | Self::RainNight => "☂",
            Self::Thunderstorm => "⚡",
            Self::Snow => "❄",
            Self::Fog => "≋",
            Self::Unknown => "?",
        }
    }
}

/// Upstream-hosted image for an icon code.
pub fn icon_url(code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{code}@2x.png")
}
