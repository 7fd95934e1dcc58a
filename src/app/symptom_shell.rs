use crate::core::symptoms::SymptomSelector;
use crate::core::timer::Debouncer;
use crate::core::{AnalysisBackend, AnalysisPage, SymptomCatalog};
use crate::utils::error::Result;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectCommand {
    Search(String),
    Add(String),
    Remove(String),
    List,
    Submit,
    Help,
    Quit,
    Unknown(String),
}

/// 空白行回傳 None
pub fn parse_select_command(line: &str) -> Option<SelectCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word.to_lowercase().as_str() {
        "search" | "s" => SelectCommand::Search(rest.to_string()),
        "add" | "a" => SelectCommand::Add(rest.to_string()),
        "remove" | "rm" => SelectCommand::Remove(rest.to_string()),
        "list" | "ls" => SelectCommand::List,
        "submit" => SelectCommand::Submit,
        "help" | "?" => SelectCommand::Help,
        "quit" | "exit" | "q" => SelectCommand::Quit,
        _ => SelectCommand::Unknown(line.to_string()),
    };
    Some(command)
}

const HELP: &str = "commands: search <text> | add <symptom> | remove <symptom> | list | submit | quit";

fn print_options<W: Write>(out: &mut W, options: &[&str]) -> Result<()> {
    if options.is_empty() {
        writeln!(out, "(no matching symptoms)")?;
    }
    for option in options {
        writeln!(out, "  - {}", option)?;
    }
    Ok(())
}

fn print_selected<W: Write, C: SymptomCatalog, B: AnalysisBackend>(
    out: &mut W,
    selector: &SymptomSelector<C, B>,
) -> Result<()> {
    let selected = selector.selected();
    writeln!(
        out,
        "selected ({}/{}): {}",
        selected.len(),
        crate::core::symptoms::MAX_SELECTED_SYMPTOMS,
        selected.iter().collect::<Vec<_>>().join(", ")
    )?;
    Ok(())
}

/// 互動式選擇症狀；搜尋經過去抖動，成功送出後回傳結果頁
pub async fn run_select_shell<C, B, R, W>(
    selector: &mut SymptomSelector<C, B>,
    debounce: Duration,
    input: R,
    out: &mut W,
) -> Result<Option<AnalysisPage>>
where
    C: SymptomCatalog,
    B: AnalysisBackend,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let (mut debouncer, mut settled) = Debouncer::new(debounce);
    let mut input_done = false;

    writeln!(out, "{}", HELP)?;

    loop {
        tokio::select! {
            line = lines.next_line(), if !input_done => {
                let Some(line) = line? else {
                    // 輸入結束：送出還在等待的搜尋後離開
                    input_done = true;
                    debouncer.close();
                    continue;
                };
                let Some(command) = parse_select_command(&line) else {
                    continue;
                };
                match command {
                    SelectCommand::Search(query) => {
                        debouncer.push(query);
                    }
                    SelectCommand::Add(symptom) => match selector.add(&symptom) {
                        Ok(()) => print_selected(out, selector)?,
                        Err(e) => writeln!(out, "⚠️  {}", e.user_friendly_message())?,
                    },
                    SelectCommand::Remove(symptom) => {
                        if selector.remove(&symptom) {
                            print_selected(out, selector)?;
                        } else {
                            writeln!(out, "'{}' was not selected", symptom.trim())?;
                        }
                    }
                    SelectCommand::List => {
                        print_selected(out, selector)?;
                        writeln!(out, "selected_symptoms={}", selector.selected().joined())?;
                    }
                    SelectCommand::Submit => match selector.submit().await {
                        Ok(page) => {
                            writeln!(out, "✅ analysis returned HTTP {}", page.status)?;
                            return Ok(Some(page));
                        }
                        Err(e) => writeln!(out, "❌ {}", e.user_friendly_message())?,
                    },
                    SelectCommand::Help => writeln!(out, "{}", HELP)?,
                    SelectCommand::Quit => return Ok(None),
                    SelectCommand::Unknown(text) => {
                        writeln!(out, "unknown command '{}'; {}", text, HELP)?
                    }
                }
            }
            query = settled.recv() => {
                let Some(query) = query else {
                    return Ok(None);
                };
                match selector.search(&query).await {
                    Ok(options) => print_options(out, &options)?,
                    Err(e) => writeln!(out, "❌ search failed: {}", e.user_friendly_message())?,
                }
            }
        }
    }
}

/// 一次性：依序加入症狀並送出；被拒絕的症狀只會提示
pub async fn diagnose<C, B, W>(
    selector: &mut SymptomSelector<C, B>,
    symptoms: &[String],
    out: &mut W,
) -> Result<AnalysisPage>
where
    C: SymptomCatalog,
    B: AnalysisBackend,
    W: Write,
{
    for symptom in symptoms {
        if let Err(e) = selector.add(symptom) {
            writeln!(out, "⚠️  skipped '{}': {}", symptom, e.user_friendly_message())?;
        }
    }
    selector.submit().await
}

/// 搜尋並列出結果
pub async fn search_once<C, B, W>(
    selector: &mut SymptomSelector<C, B>,
    query: &str,
    out: &mut W,
) -> Result<usize>
where
    C: SymptomCatalog,
    B: AnalysisBackend,
    W: Write,
{
    let options = selector.search(query).await?;
    print_options(out, &options)?;
    Ok(options.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select_command() {
        assert_eq!(parse_select_command("   "), None);
        assert_eq!(
            parse_select_command("add  Skin Rash "),
            Some(SelectCommand::Add("Skin Rash".to_string()))
        );
        assert_eq!(
            parse_select_command("search"),
            Some(SelectCommand::Search(String::new()))
        );
        assert_eq!(
            parse_select_command("RM chills"),
            Some(SelectCommand::Remove("chills".to_string()))
        );
        assert_eq!(parse_select_command("submit"), Some(SelectCommand::Submit));
        assert_eq!(
            parse_select_command("dance"),
            Some(SelectCommand::Unknown("dance".to_string()))
        );
    }
}
