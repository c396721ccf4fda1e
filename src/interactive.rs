//! Terminal prompts: choosing the page order and the output location.
//!
//! The workflow only talks to the [`Prompter`] trait; [`TerminalPrompter`]
//! is the text implementation over any `BufRead` + `Write` pair, so the
//! whole dialogue can be driven from a byte buffer in tests.
//!
//! Every question is a plain ask → validate → ask-again loop. Bad answers
//! are explained and re-asked; they are never returned as errors. Closing
//! the input stream mid-question returns [`ConvertError::PromptAborted`].

use crate::convert::ensure_pdf_extension;
use crate::error::{ConvertError, OrderingError};
use crate::pipeline::locate::ImageSet;
use crate::pipeline::order::{apply_order, parse_order};
use crate::workflow::default_output_path;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const RULE: &str = "============================================================";

/// The decisions the workflow may hand to a user.
pub trait Prompter {
    /// Return `images` in the order the user wants.
    fn choose_order(&mut self, images: &ImageSet) -> Result<ImageSet, ConvertError>;

    /// Return where the PDF should be written. `first_image` is the first
    /// image of the final order.
    fn choose_output(&mut self, first_image: &Path) -> Result<PathBuf, ConvertError>;
}

/// Text dialogue over a reader/writer pair.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Ask for the input path(s) when none were given on the command line.
    ///
    /// An answer naming one existing path (spaces included) is taken as is;
    /// otherwise it is split on whitespace. Surrounding quotes are removed.
    /// A blank answer yields an empty list.
    pub fn ask_inputs(&mut self) -> Result<Vec<PathBuf>, ConvertError> {
        let answer = self.ask("Enter image file(s) or directory path: ")?;
        Ok(split_input_paths(&answer))
    }

    /// Ask for an output filename; blank means "decide later".
    pub fn ask_output_name(&mut self) -> Result<Option<PathBuf>, ConvertError> {
        let answer =
            self.ask("Enter output PDF filename (press Enter for 'converted_images.pdf'): ")?;
        let answer = strip_quotes(&answer);
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(answer)))
        }
    }

    /// Print a numbered list of file names.
    fn show_list(&mut self, title: &str, images: &ImageSet) -> Result<(), ConvertError> {
        self.say(&format!("\n{RULE}\n{title}\n{RULE}"))?;
        for (i, path) in images.iter().enumerate() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            self.say(&format!("{:2}. {}", i + 1, name))?;
        }
        self.say(RULE)
    }

    fn custom_order(&mut self, images: &ImageSet) -> Result<ImageSet, ConvertError> {
        let n = images.len();
        self.say(&format!(
            "\nEnter the order using numbers 1-{n} separated by spaces."
        ))?;
        self.say("Example: 3 1 4 2 5 (to put image 3 first, then 1, then 4, etc.)")?;

        loop {
            let answer = self.ask("Order: ")?;
            let reordered = match parse_order(&answer).and_then(|p| apply_order(images, &p)) {
                Ok(r) => r,
                Err(OrderingError::Malformed { .. }) => {
                    self.say("Error: Please enter only numbers separated by spaces.")?;
                    continue;
                }
                Err(OrderingError::LengthMismatch { expected, .. }) => {
                    self.say(&format!("Error: Please specify exactly {expected} numbers."))?;
                    continue;
                }
                Err(OrderingError::NotAPermutation { n }) => {
                    self.say(&format!(
                        "Error: Please use each number from 1 to {n} exactly once."
                    ))?;
                    continue;
                }
            };

            self.show_list("New order:", &reordered)?;
            let confirm = self.ask("\nConfirm this order? (y/n): ")?.to_lowercase();
            if confirm == "y" || confirm == "yes" {
                return Ok(reordered);
            }
            self.say("Let's try again...")?;
        }
    }

    /// Write `question` without a newline and read one trimmed line.
    fn ask(&mut self, question: &str) -> Result<String, ConvertError> {
        write!(self.output, "{question}").map_err(terminal_error)?;
        self.output.flush().map_err(terminal_error)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(terminal_error)?;
        if read == 0 {
            return Err(ConvertError::PromptAborted);
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, line: &str) -> Result<(), ConvertError> {
        writeln!(self.output, "{line}").map_err(terminal_error)
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn choose_order(&mut self, images: &ImageSet) -> Result<ImageSet, ConvertError> {
        self.show_list("FOUND IMAGES:", images)?;
        self.say("\nHow would you like to arrange these images in the PDF?")?;
        self.say("1. Default order (as listed above)")?;
        self.say("2. Custom order (specify by numbers)")?;

        loop {
            match self.ask("\nEnter your choice (1 or 2): ")?.as_str() {
                "1" => return Ok(images.clone()),
                "2" => return self.custom_order(images),
                _ => self.say("Invalid choice. Please enter 1 or 2.")?,
            }
        }
    }

    fn choose_output(&mut self, first_image: &Path) -> Result<PathBuf, ConvertError> {
        self.say("\nWhere do you want to save the PDF?")?;
        self.say("1. Same location as the first image")?;
        self.say("2. Custom location")?;

        loop {
            match self.ask("Enter your choice (1 or 2): ")?.as_str() {
                "1" => return Ok(default_output_path(first_image)),
                "2" => loop {
                    let answer = self.ask("Enter full path for PDF (including filename): ")?;
                    let answer = strip_quotes(&answer);
                    if !answer.is_empty() {
                        return Ok(ensure_pdf_extension(Path::new(answer)));
                    }
                    self.say("Please enter a path.")?;
                },
                _ => self.say("Invalid choice. Please enter 1 or 2.")?,
            }
        }
    }
}

fn terminal_error(e: io::Error) -> ConvertError {
    ConvertError::Internal(format!("terminal I/O failed: {e}"))
}

fn strip_quotes(s: &str) -> &str {
    s.trim().trim_matches('"').trim_matches('\'')
}

/// One existing path as-is, otherwise whitespace-separated paths.
fn split_input_paths(answer: &str) -> Vec<PathBuf> {
    let whole = strip_quotes(answer);
    if whole.is_empty() {
        return Vec::new();
    }
    if Path::new(whole).exists() {
        return vec![PathBuf::from(whole)];
    }
    whole
        .split_whitespace()
        .map(strip_quotes)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
