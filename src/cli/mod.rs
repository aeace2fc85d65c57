use std::io::{self, IsTerminal, Read};

use clap::Parser;

/// Command-line interface for nasa-query.
#[derive(Parser, Debug)]
#[command(name = "nasa-query")]
#[command(
    about = "通过自然语言查询 NASA 开放数据 / Query NASA open data with natural language",
    long_about = None
)]
pub struct Cli {
    /// NASA API key; takes precedence over NASA_API_KEY and ~/.cursor/mcp.json.
    #[arg(long = "api_key", value_name = "KEY")]
    pub api_key: Option<String>,

    /// Date to query (YYYY-MM-DD); replaces any date found in the text.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// Read the query from standard input even when it is a terminal.
    #[arg(long)]
    pub stdio: bool,

    /// Timeout applied per upstream request (seconds); defaults to NASA_TIMEOUT_SECS or 10.
    #[arg(
        long = "timeout_secs",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: Option<u64>,

    /// Free-text query, e.g. "火星 毅力号" or "2024年3月18日".
    #[arg(allow_negative_numbers = true)]
    pub query: Vec<String>,
}

pub const USAGE: &str = "\
使用方法 / Usage: nasa-query [--api_key=KEY] [--date=YYYY-MM-DD] [--stdio] <查询 query>

1. 每日天文图片 / Astronomy Picture of the Day:
   - 获取今天的图片：echo \"今天\" | nasa-query --stdio
   - 获取指定日期的图片：echo \"2024年3月18日\" | nasa-query --stdio
2. 火星照片 / Mars rover photos:
   - 获取好奇号照片：echo \"火星 好奇号\" | nasa-query --stdio
   - 获取毅力号照片：echo \"火星 毅力号\" | nasa-query --stdio
3. 地球卫星图像 / Earth imagery:
   - 获取指定位置的图像：echo \"地球 39.9042,116.4074\" | nasa-query --stdio
4. 近地天体数据 / Near-Earth objects:
   - 获取今天的近地天体：echo \"近地天体\" | nasa-query --stdio
5. 太空天气 / Space weather:
   - 获取太空天气信息：echo \"太空天气\" | nasa-query --stdio

API key 可以通过以下方式提供 / The API key is read from:
  - 命令行参数 / flag: --api_key=YOUR_API_KEY
  - 环境变量 / environment: NASA_API_KEY
  - MCP配置文件 / config file: ~/.cursor/mcp.json (mcpServers.nasa.env.NASA_API_KEY)";

/// Query text from piped input and positional words, input first
pub fn read_query(words: &[String], force_stdin: bool) -> io::Result<String> {
    let stdin = io::stdin();
    let piped = if force_stdin || !stdin.is_terminal() {
        let mut buf = Vec::new();
        stdin.lock().read_to_end(&mut buf)?;
        Some(decode_input(&buf))
    } else {
        None
    };
    Ok(merge_query(piped.as_deref(), words))
}

/// Piped bytes as text; invalid UTF-8 becomes U+FFFD instead of an error
pub fn decode_input(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

pub fn merge_query(piped: Option<&str>, words: &[String]) -> String {
    let from_args = words.join(" ");
    format!("{} {}", piped.unwrap_or_default().trim(), from_args.trim())
        .trim()
        .to_string()
}
