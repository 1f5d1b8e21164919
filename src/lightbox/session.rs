use std::rc::Rc;

use rand::RngCore;
use tracing::{debug, trace};

use super::controller::{Flow, LightboxCommand, LightboxController, LightboxView};
use super::slideshow::Ticker;
use crate::error::Result;
use crate::models::MediaCatalog;
use crate::vault::Vault;

/// Owner of the single lightbox a host view may show.
///
/// Opening while another lightbox is open closes the old one first, so its
/// timer and listeners are gone before the new overlay is built.
pub struct LightboxSession<V: LightboxView> {
    vault: Rc<dyn Vault>,
    ticker: Rc<dyn Ticker>,
    active: Option<LightboxController<V>>,
}

impl<V: LightboxView> LightboxSession<V> {
    pub fn new(vault: Rc<dyn Vault>, ticker: Rc<dyn Ticker>) -> Self {
        Self {
            vault,
            ticker,
            active: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn controller(&self) -> Option<&LightboxController<V>> {
        self.active.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut LightboxController<V>> {
        self.active.as_mut()
    }

    pub fn open(&mut self, catalog: MediaCatalog, start_index: usize, view: V) -> Result<()> {
        self.open_with_rng(catalog, start_index, view, Box::new(rand::rng()))
    }

    pub fn open_with_rng(
        &mut self,
        catalog: MediaCatalog,
        start_index: usize,
        view: V,
        rng: Box<dyn RngCore>,
    ) -> Result<()> {
        // Reject before touching the open lightbox.
        catalog.check_index(start_index)?;
        self.close();

        let controller = LightboxController::open_with_rng(
            catalog,
            start_index,
            view,
            self.vault.clone(),
            self.ticker.clone(),
            rng,
        )?;
        self.active = Some(controller);
        Ok(())
    }

    pub fn dispatch(&mut self, command: LightboxCommand) -> Flow {
        let Some(controller) = self.active.as_mut() else {
            trace!(?command, "no open lightbox, ignoring command");
            return Flow::Closed;
        };

        let flow = controller.dispatch(command);
        if flow == Flow::Closed {
            self.active = None;
        }
        flow
    }

    pub fn slideshow_tick(&mut self, generation: u64) -> bool {
        match self.active.as_mut() {
            Some(controller) => controller.slideshow_tick(generation),
            None => {
                debug!(generation, "slideshow tick after close");
                false
            }
        }
    }

    pub fn close(&mut self) {
        if let Some(mut controller) = self.active.take() {
            controller.close();
        }
    }
}
