//! Locates gallery code blocks in a markdown note.

/// Info string that marks a fenced block as a gallery.
pub const GALLERY_BLOCK_LANGUAGE: &str = "gallery-pro";

/// A fenced gallery block: its body and the 1-based line of its opening fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryBlock {
    pub line: usize,
    pub body: String,
}

/// Finds every ```` ```gallery-pro ```` (or `~~~`) block in `markdown`.
///
/// An unterminated block runs to the end of the note.
pub fn find_gallery_blocks(markdown: &str) -> Vec<GalleryBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<(Fence, Option<GalleryBlock>)> = None;

    for (number, line) in markdown.lines().enumerate() {
        let trimmed = line.trim_start();

        match open.as_mut() {
            None => {
                if let Some((fence, info)) = Fence::opening(trimmed) {
                    let block = (info.split_whitespace().next() == Some(GALLERY_BLOCK_LANGUAGE))
                        .then(|| GalleryBlock {
                            line: number + 1,
                            body: String::new(),
                        });
                    open = Some((fence, block));
                }
            }
            Some((fence, block)) => {
                if fence.closes(trimmed) {
                    if let Some(block) = block.take() {
                        blocks.push(block);
                    }
                    open = None;
                } else if let Some(block) = block.as_mut() {
                    block.body.push_str(line);
                    block.body.push('\n');
                }
            }
        }
    }

    if let Some((_, Some(block))) = open {
        blocks.push(block);
    }
    blocks
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn opening(line: &str) -> Option<(Self, &str)> {
        let marker = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = line.chars().take_while(|c| *c == marker).count();
        if len < 3 {
            return None;
        }
        Some((Self { marker, len }, line[len..].trim()))
    }

    fn closes(&self, line: &str) -> bool {
        let len = line.chars().take_while(|c| *c == self.marker).count();
        len >= self.len && line[len..].trim().is_empty()
    }
}
