/// Domain models for the application
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Query topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Apod,
    Mars,
    Earth,
    Neo,
    Weather,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Apod => "APOD",
            Category::Mars => "MARS",
            Category::Earth => "EARTH",
            Category::Neo => "NEO",
            Category::Weather => "WEATHER",
        };
        f.write_str(name)
    }
}

/// Mars surface rover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rover {
    #[default]
    Curiosity,
    Opportunity,
    Spirit,
    Perseverance,
}

impl Rover {
    /// Name used in the mars-photos API path
    pub fn api_name(&self) -> &'static str {
        match self {
            Rover::Curiosity => "curiosity",
            Rover::Opportunity => "opportunity",
            Rover::Spirit => "spirit",
            Rover::Perseverance => "perseverance",
        }
    }
}

impl fmt::Display for Rover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// Structured intent extracted from free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub category: Category,
    pub rover: Option<Rover>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub date: NaiveDate,
    /// Requested date before it was clamped to today
    pub clamped_from: Option<NaiveDate>,
}

/// Per-request parameters shared by every upstream call
#[derive(Debug, Clone)]
pub struct RequestParams {
    pub api_key: String,
    pub date: NaiveDate,
}

impl RequestParams {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Astronomy Picture of the Day
#[derive(Debug, Serialize)]
pub struct ApodResult {
    #[serde(rename = "标题")]
    pub title: Option<String>,
    #[serde(rename = "日期")]
    pub date: Option<String>,
    #[serde(rename = "说明")]
    pub explanation: Option<String>,
    #[serde(rename = "图片链接")]
    pub url: Option<String>,
    #[serde(rename = "高清图片链接")]
    pub hdurl: Option<String>,
    #[serde(rename = "媒体类型")]
    pub media_type: Option<String>,
    #[serde(rename = "版权")]
    pub copyright: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MarsPhoto {
    pub id: Option<i64>,
    #[serde(rename = "拍摄时间")]
    pub earth_date: Option<String>,
    #[serde(rename = "相机")]
    pub camera: Option<String>,
    #[serde(rename = "图片链接")]
    pub img_src: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MarsResult {
    #[serde(rename = "火星车")]
    pub rover: String,
    #[serde(rename = "日期")]
    pub date: String,
    #[serde(rename = "照片数量")]
    pub photo_count: usize,
    #[serde(rename = "照片列表")]
    pub photos: Vec<MarsPhoto>,
}

#[derive(Debug, Serialize)]
pub struct EarthResult {
    #[serde(rename = "经度")]
    pub longitude: String,
    #[serde(rename = "纬度")]
    pub latitude: String,
    #[serde(rename = "日期")]
    pub date: String,
    #[serde(rename = "图片链接")]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Diameter {
    #[serde(rename = "最小")]
    pub min: Option<i64>,
    #[serde(rename = "最大")]
    pub max: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct NeoEntry {
    #[serde(rename = "名称")]
    pub name: Option<String>,
    #[serde(rename = "直径")]
    pub diameter: Diameter,
    #[serde(rename = "是否危险")]
    pub hazardous: &'static str,
    #[serde(rename = "最近距离")]
    pub miss_distance: Option<String>,
    #[serde(rename = "相对速度")]
    pub velocity: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NeoResult {
    #[serde(rename = "日期")]
    pub date: String,
    #[serde(rename = "小行星数量")]
    pub count: usize,
    #[serde(rename = "小行星列表")]
    pub objects: Vec<NeoEntry>,
}

#[derive(Debug, Serialize)]
pub struct FlareEvent {
    #[serde(rename = "开始时间")]
    pub begin_time: Option<String>,
    #[serde(rename = "结束时间")]
    pub end_time: Option<String>,
    #[serde(rename = "等级")]
    pub class_type: Option<String>,
    #[serde(rename = "位置")]
    pub source_location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CmeEvent {
    #[serde(rename = "时间")]
    pub start_time: Option<String>,
    #[serde(rename = "速度")]
    pub speed: String,
    #[serde(rename = "类型")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SolarImage {
    #[serde(rename = "描述")]
    pub description: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SdoImages {
    #[serde(rename = "紫外线图像")]
    pub aia_171: SolarImage,
    #[serde(rename = "日冕图像")]
    pub aia_304: SolarImage,
    #[serde(rename = "极紫外线图像")]
    pub aia_193: SolarImage,
    #[serde(rename = "高温日冕图像")]
    pub aia_211: SolarImage,
    #[serde(rename = "磁场图像")]
    pub hmi: SolarImage,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SohoImages {
    #[serde(rename = "外日冕图像")]
    pub lasco_c2: SolarImage,
    #[serde(rename = "大范围日冕图像")]
    pub lasco_c3: SolarImage,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SolarImages {
    #[serde(rename = "SDO")]
    pub sdo: SdoImages,
    #[serde(rename = "SOHO")]
    pub soho: SohoImages,
}

/// Latest-image links published by SDO and SOHO; no request needed
pub const SOLAR_IMAGES: SolarImages = SolarImages {
    sdo: SdoImages {
        aia_171: SolarImage {
            description: "AIA 171 - 紫外线波段，显示日冕和过渡区",
            url: "https://sdo.gsfc.nasa.gov/assets/img/latest/latest_1024_0171.jpg",
        },
        aia_304: SolarImage {
            description: "AIA 304 - 氦离子辐射，显示色球层和过渡区",
            url: "https://sdo.gsfc.nasa.gov/assets/img/latest/latest_1024_0304.jpg",
        },
        aia_193: SolarImage {
            description: "AIA 193 - 极紫外线波段，显示日冕活动区",
            url: "https://sdo.gsfc.nasa.gov/assets/img/latest/latest_1024_0193.jpg",
        },
        aia_211: SolarImage {
            description: "AIA 211 - 高温日冕结构",
            url: "https://sdo.gsfc.nasa.gov/assets/img/latest/latest_1024_0211.jpg",
        },
        hmi: SolarImage {
            description: "HMI - 太阳表面磁场强度图",
            url: "https://sdo.gsfc.nasa.gov/assets/img/latest/latest_1024_HMIIF.jpg",
        },
    },
    soho: SohoImages {
        lasco_c2: SolarImage {
            description: "LASCO C2 - 2-6太阳半径范围的日冕",
            url: "https://soho.nascom.nasa.gov/data/LATEST/current_c2.gif",
        },
        lasco_c3: SolarImage {
            description: "LASCO C3 - 3.7-30太阳半径范围的日冕",
            url: "https://soho.nascom.nasa.gov/data/LATEST/current_c3.gif",
        },
    },
};

#[derive(Debug, Serialize)]
pub struct WeatherResult {
    #[serde(rename = "日期")]
    pub date: String,
    #[serde(rename = "太阳耀斑")]
    pub flares: Vec<FlareEvent>,
    #[serde(rename = "日冕物质抛射")]
    pub cmes: Vec<CmeEvent>,
    #[serde(rename = "太阳图像")]
    pub solar_images: SolarImages,
}

/// Category-specific labeled result
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResultPayload {
    Apod(ApodResult),
    Mars(MarsResult),
    Earth(EarthResult),
    Neo(NeoResult),
    Weather(WeatherResult),
}
