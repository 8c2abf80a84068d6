//! 平台命令格式
//!
//! 决定脚本扩展名、命令分隔符和脚本解释器。启动时确定一次，之后不变。

use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;

/// 脚本运行平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// POSIX shell (`sh`)
    Posix,
    /// Windows 命令提示符 (`cmd`)
    Windows,
}

impl Platform {
    /// 当前编译目标对应的平台
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    /// 同一脚本内多条命令之间的分隔符
    pub fn command_separator(self) -> &'static str {
        match self {
            Platform::Posix => ";",
            Platform::Windows => " & ",
        }
    }

    /// 脚本文件扩展名（含点号）
    pub fn script_extension(self) -> &'static str {
        match self {
            Platform::Posix => ".sh",
            Platform::Windows => ".bat",
        }
    }

    /// 脚本解释器程序
    pub fn interpreter(self) -> &'static str {
        match self {
            Platform::Posix => "sh",
            Platform::Windows => "cmd",
        }
    }

    /// 解释器在脚本路径之前的参数
    pub fn interpreter_args(self) -> &'static [&'static str] {
        match self {
            Platform::Posix => &[],
            Platform::Windows => &["/C"],
        }
    }

    /// 默认的渲染程序相对路径
    pub fn default_renderer(self) -> &'static str {
        match self {
            Platform::Posix => "lib/pdf2htmlEX",
            Platform::Windows => "lib\\pdf2HtmlEx.exe",
        }
    }

    /// 按目标 shell 的规则给参数加引号
    ///
    /// 只含安全字符的参数原样返回，保持生成的脚本易读。
    pub fn quote(self, arg: &str) -> String {
        let is_plain = !arg.is_empty()
            && arg
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-_./\\:=+,".contains(c));
        if is_plain {
            return arg.to_string();
        }
        match self {
            Platform::Posix => format!("'{}'", arg.replace('\'', r"'\''")),
            Platform::Windows => format!(
                "\"{}\"",
                arg.replace('"', "\"\"").replace('%', "%%")
            ),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "posix" | "linux" | "unix" | "sh" => Ok(Platform::Posix),
            "windows" | "win" | "cmd" => Ok(Platform::Windows),
            other => Err(format!("未知平台: {}", other)),
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Posix => write!(f, "posix"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_format_per_platform() {
        assert_eq!(Platform::Posix.command_separator(), ";");
        assert_eq!(Platform::Posix.script_extension(), ".sh");
        assert_eq!(Platform::Windows.command_separator(), " & ");
        assert_eq!(Platform::Windows.script_extension(), ".bat");
        assert_eq!(Platform::Windows.interpreter_args(), &["/C"]);
    }

    #[test]
    fn test_quote() {
        assert_eq!(Platform::Posix.quote("/tmp/book.pdf"), "/tmp/book.pdf");
        assert_eq!(Platform::Posix.quote("/tmp/my book.pdf"), "'/tmp/my book.pdf'");
        assert_eq!(Platform::Posix.quote("it's.pdf"), r"'it'\''s.pdf'");
        assert_eq!(
            Platform::Windows.quote(r"C:\My Books\a.pdf"),
            r#""C:\My Books\a.pdf""#
        );
    }

    #[test]
    fn test_windows_quote_escapes_percent() {
        assert_eq!(
            Platform::Windows.quote(r"C:\books\100%\a.pdf"),
            r#""C:\books\100%%\a.pdf""#
        );
        assert_eq!(Platform::Posix.quote("100%.pdf"), "'100%.pdf'");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Posix);
        assert_eq!("Windows".parse::<Platform>().unwrap(), Platform::Windows);
        assert!("beos".parse::<Platform>().is_err());
    }
}
