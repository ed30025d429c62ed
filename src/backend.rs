use crate::error::Error;
use crate::model::DrawInstruction;

/// Consumer of the engine's output. Instructions arrive in draw order and
/// belong to the page most recently started with `new_page`.
pub trait DrawingBackend {
    fn new_page(&mut self, number: u32) -> Result<(), Error>;
    fn draw(&mut self, instruction: DrawInstruction) -> Result<(), Error>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub number: u32,
    pub instructions: Vec<DrawInstruction>,
}

/// Keeps every page's instruction stream in memory.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pages: Vec<Page>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

impl DrawingBackend for Recorder {
    fn new_page(&mut self, number: u32) -> Result<(), Error> {
        self.pages.push(Page {
            number,
            instructions: Vec::new(),
        });
        Ok(())
    }

    fn draw(&mut self, instruction: DrawInstruction) -> Result<(), Error> {
        let page = self
            .pages
            .last_mut()
            .ok_or_else(|| Error::Pdf("instruction drawn before the first page".into()))?;
        page.instructions.push(instruction);
        Ok(())
    }
}
