// Background texture decoding for grid tiles, lightbox thumbnails and the main image
// Raster files decode on worker threads; results are uploaded and cached on the main loop

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gdk4::{MemoryFormat, MemoryTexture, Texture};
use gtk4::glib;
use gtk4::prelude::*;
use lru::LruCache;

use crate::image_loader::{decode_image, is_raster, DecodedImage};

/// Longest edge for gallery grid tiles.
pub const TILE_DECODE_EDGE: u32 = 512;
/// Longest edge for lightbox strip thumbnails.
pub const THUMB_DECODE_EDGE: u32 = 192;
/// Longest edge for the main lightbox image.
pub const VIEW_DECODE_EDGE: u32 = 3072;

const DECODE_WORKERS: usize = 2;

/// Full-view textures kept around (current entry plus recent neighbours).
/// Each one can be tens of megabytes, so they get their own small cache.
const VIEW_CACHE_ENTRIES: usize = 3;

type Done = Box<dyn FnOnce(Option<Texture>)>;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    path: PathBuf,
    max_edge: u32,
}

impl CacheKey {
    fn is_full_view(&self) -> bool {
        self.max_edge >= VIEW_DECODE_EDGE
    }
}

/// Two LRUs: a roomy one for tiles and strip thumbnails, and a small one
/// for full-view decodes so a slideshow cannot pin many large textures.
struct TextureCache<V> {
    previews: LruCache<CacheKey, V>,
    full_view: LruCache<CacheKey, V>,
}

impl<V: Clone> TextureCache<V> {
    fn new(preview_entries: usize) -> Self {
        let capacity = |n: usize| NonZeroUsize::new(n.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            previews: LruCache::new(capacity(preview_entries)),
            full_view: LruCache::new(capacity(VIEW_CACHE_ENTRIES)),
        }
    }

    fn tier(&mut self, key: &CacheKey) -> &mut LruCache<CacheKey, V> {
        if key.is_full_view() {
            &mut self.full_view
        } else {
            &mut self.previews
        }
    }

    fn get(&mut self, key: &CacheKey) -> Option<V> {
        self.tier(key).get(key).cloned()
    }

    fn put(&mut self, key: CacheKey, value: V) {
        self.tier(&key).put(key, value);
    }
}

struct DecodeRequest {
    ticket: u64,
    key: CacheKey,
}

struct DecodeResult {
    ticket: u64,
    key: CacheKey,
    decoded: anyhow::Result<DecodedImage>,
}

pub struct TextureLoader {
    requests: flume::Sender<DecodeRequest>,
    cache: RefCell<TextureCache<Texture>>,
    pending: RefCell<HashMap<u64, Done>>,
    next_ticket: Cell<u64>,
}

impl TextureLoader {
    pub fn new(cache_entries: usize) -> Rc<Self> {
        let (request_tx, request_rx) = flume::unbounded::<DecodeRequest>();
        let (result_tx, result_rx) = async_channel::unbounded::<DecodeResult>();

        for _ in 0..DECODE_WORKERS {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            std::thread::spawn(move || {
                while let Ok(request) = rx.recv() {
                    let decoded = decode_image(&request.key.path, request.key.max_edge);
                    let result = DecodeResult {
                        ticket: request.ticket,
                        key: request.key,
                        decoded,
                    };
                    if tx.send_blocking(result).is_err() {
                        break;
                    }
                }
            });
        }

        let loader = Rc::new(Self {
            requests: request_tx,
            cache: RefCell::new(TextureCache::new(cache_entries)),
            pending: RefCell::new(HashMap::new()),
            next_ticket: Cell::new(0),
        });

        let loader_weak = Rc::downgrade(&loader);
        glib::spawn_future_local(async move {
            while let Ok(result) = result_rx.recv().await {
                if let Some(loader) = loader_weak.upgrade() {
                    loader.finish(result);
                } else {
                    break;
                }
            }
        });

        loader
    }

    /// Loads `path` scaled to `max_edge` and hands the texture to `done` on
    /// the main loop. Cached textures are delivered synchronously.
    pub fn load<F>(&self, path: &Path, max_edge: u32, done: F)
    where
        F: FnOnce(Option<Texture>) + 'static,
    {
        let key = CacheKey {
            path: path.to_path_buf(),
            max_edge,
        };

        let cached = self.cache.borrow_mut().get(&key);
        if let Some(texture) = cached {
            done(Some(texture));
            return;
        }

        if !is_raster(path) {
            // Vector images go through gdk's own loaders.
            let texture = Texture::from_filename(path)
                .map_err(|e| tracing::warn!("Failed to load {:?}: {}", path, e))
                .ok();
            if let Some(texture) = &texture {
                self.cache.borrow_mut().put(key, texture.clone());
            }
            done(texture);
            return;
        }

        let ticket = self.next_ticket.get().wrapping_add(1);
        self.next_ticket.set(ticket);
        self.pending.borrow_mut().insert(ticket, Box::new(done));

        if self.requests.send(DecodeRequest { ticket, key }).is_err() {
            tracing::warn!("Decode workers are gone, dropping {:?}", path);
            let done = self.pending.borrow_mut().remove(&ticket);
            if let Some(done) = done {
                done(None);
            }
        }
    }

    fn finish(&self, result: DecodeResult) {
        let done = self.pending.borrow_mut().remove(&result.ticket);
        let Some(done) = done else {
            return;
        };

        let texture = match result.decoded {
            Ok(image) => texture_from_rgba(&image),
            Err(e) => {
                tracing::warn!("Failed to decode {:?}: {:#}", result.key.path, e);
                None
            }
        };

        if let Some(texture) = &texture {
            self.cache.borrow_mut().put(result.key, texture.clone());
        }
        done(texture);
    }
}

fn texture_from_rgba(image: &DecodedImage) -> Option<Texture> {
    if image.width == 0 || image.height == 0 {
        return None;
    }
    let expected = image.stride() * image.height as usize;
    if image.rgba.len() < expected {
        tracing::warn!(
            "Skipping texture: data too small ({} bytes for {}x{})",
            image.rgba.len(),
            image.width,
            image.height
        );
        return None;
    }
    let bytes = glib::Bytes::from(&image.rgba[..]);
    let texture = MemoryTexture::new(
        image.width as i32,
        image.height as i32,
        MemoryFormat::R8g8b8a8,
        &bytes,
        image.stride(),
    );
    Some(texture.upcast())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, max_edge: u32) -> CacheKey {
        CacheKey {
            path: PathBuf::from(name),
            max_edge,
        }
    }

    #[test]
    fn test_full_view_decodes_do_not_evict_previews() {
        let mut cache: TextureCache<u32> = TextureCache::new(4);
        cache.put(key("tile.png", TILE_DECODE_EDGE), 1);
        cache.put(key("thumb.png", THUMB_DECODE_EDGE), 2);

        for i in 0..10 {
            cache.put(key(&format!("view{i}.png"), VIEW_DECODE_EDGE), 100 + i);
        }

        assert_eq!(cache.get(&key("tile.png", TILE_DECODE_EDGE)), Some(1));
        assert_eq!(cache.get(&key("thumb.png", THUMB_DECODE_EDGE)), Some(2));
        assert_eq!(cache.full_view.len(), VIEW_CACHE_ENTRIES);
        assert_eq!(cache.get(&key("view9.png", VIEW_DECODE_EDGE)), Some(109));
        assert_eq!(cache.get(&key("view0.png", VIEW_DECODE_EDGE)), None);
    }

    #[test]
    fn test_same_path_is_cached_per_size() {
        let mut cache: TextureCache<u32> = TextureCache::new(4);
        cache.put(key("a.png", TILE_DECODE_EDGE), 1);
        assert_eq!(cache.get(&key("a.png", VIEW_DECODE_EDGE)), None);
        cache.put(key("a.png", VIEW_DECODE_EDGE), 2);
        assert_eq!(cache.get(&key("a.png", TILE_DECODE_EDGE)), Some(1));
        assert_eq!(cache.get(&key("a.png", VIEW_DECODE_EDGE)), Some(2));
    }
}
