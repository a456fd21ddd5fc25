#![forbid(unsafe_code)]

//! A [`Menu`] backed by a [`TreeNavigator`].
//!
//! The content provider is asked for a fresh forest on every open and after
//! any activation that reports [`Activation::Rebuild`]. Rebuilds keep the
//! user's place: expansion, remembered children and the selection follow the
//! node ids into the new content.

use crate::config::NavConfig;
use crate::session::{KeyDisposition, Menu, Output, SessionError};
use keynav_core::event::KeyEvent;
use keynav_widgets::tree::TreeNode;
use keynav_widgets::tree_nav::{TreeAction, TreeNavigator};
use std::fmt;

/// Supplies the forest a menu navigates.
pub trait ContentProvider<P> {
    /// Build the current content. Ids must be stable across calls.
    fn build(&mut self) -> Vec<TreeNode<P>>;
}

/// Follow-up requested by an [`ActivationHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activation {
    /// Keep navigating the current content.
    Stay,
    /// Content changed: rebuild and keep the user's place.
    Rebuild,
    /// Leave the menu.
    Close,
}

/// Receives confirmed leaf and action nodes.
///
/// The handler owns any narration about the outcome, including the case
/// where the payload's domain object no longer exists.
pub trait ActivationHandler<P> {
    /// Act on `node`.
    fn activate(&mut self, node: &TreeNode<P>, out: &mut Output<'_>) -> Activation;
}

/// [`ContentProvider`] from a closure. See [`provider_fn`].
#[derive(Clone)]
pub struct ProviderFn<F>(F);

/// [`ActivationHandler`] from a closure. See [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F>(F);

/// Wrap a closure as a [`ContentProvider`].
pub fn provider_fn<P, F>(f: F) -> ProviderFn<F>
where
    F: FnMut() -> Vec<TreeNode<P>>,
{
    ProviderFn(f)
}

/// Wrap a closure as an [`ActivationHandler`].
pub fn handler_fn<P, F>(f: F) -> HandlerFn<F>
where
    F: FnMut(&TreeNode<P>, &mut Output<'_>) -> Activation,
{
    HandlerFn(f)
}

impl<P, F> ContentProvider<P> for ProviderFn<F>
where
    F: FnMut() -> Vec<TreeNode<P>>,
{
    fn build(&mut self) -> Vec<TreeNode<P>> {
        (self.0)()
    }
}

impl<P, F> ActivationHandler<P> for HandlerFn<F>
where
    F: FnMut(&TreeNode<P>, &mut Output<'_>) -> Activation,
{
    fn activate(&mut self, node: &TreeNode<P>, out: &mut Output<'_>) -> Activation {
        (self.0)(node, out)
    }
}

/// A tree menu joining content, activation and navigation.
pub struct TreeMenu<P, C, H> {
    name: String,
    provider: C,
    handler: H,
    nav: Option<TreeNavigator<P>>,
    empty_message: String,
}

impl<P, C, H> fmt::Debug for TreeMenu<P, C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeMenu")
            .field("name", &self.name)
            .field("open", &self.nav.is_some())
            .finish_non_exhaustive()
    }
}

impl<P, C, H> TreeMenu<P, C, H>
where
    C: ContentProvider<P>,
    H: ActivationHandler<P>,
{
    /// Create a closed menu.
    pub fn new(name: impl Into<String>, provider: C, handler: H) -> Self {
        Self {
            name: name.into(),
            provider,
            handler,
            nav: None,
            empty_message: String::new(),
        }
    }

    /// The navigator, while open.
    #[must_use]
    pub fn navigator(&self) -> Option<&TreeNavigator<P>> {
        self.nav.as_ref()
    }

    /// Rebuild content in place. Returns the disposition for the key that
    /// triggered it.
    fn rebuild(&mut self, out: &mut Output<'_>) -> KeyDisposition {
        let Some(nav) = self.nav.as_mut() else {
            return KeyDisposition::Ignored;
        };
        let roots = self.provider.build();
        if let Err(err) = nav.refresh(roots) {
            tracing::warn!(menu = %self.name, error = %err, "rebuild rejected, keeping old content");
            return KeyDisposition::Consumed;
        }
        if nav.is_empty() {
            out.say(&self.empty_message);
            return KeyDisposition::Closed;
        }
        tracing::debug!(menu = %self.name, visible = nav.len(), "menu rebuilt");
        if let Some(announcement) = nav.announce_current() {
            out.announce(&announcement);
        }
        KeyDisposition::Consumed
    }
}

impl<P, C, H> Menu for TreeMenu<P, C, H>
where
    C: ContentProvider<P>,
    H: ActivationHandler<P>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self, config: &NavConfig, out: &mut Output<'_>) -> Result<bool, SessionError> {
        self.empty_message.clone_from(&config.empty_message);
        let nav = TreeNavigator::new(self.provider.build())
            .map_err(|source| SessionError::Forest {
                menu: self.name.clone(),
                source,
            })?
            .with_options(config.tree)
            .with_persistence_id(self.name.clone());

        if nav.is_empty() {
            out.say(&self.empty_message);
            self.nav = None;
            return Ok(false);
        }
        if let Some(announcement) = nav.announce_current() {
            out.announce(&announcement);
        }
        self.nav = Some(nav);
        Ok(true)
    }

    fn close(&mut self) {
        self.nav = None;
    }

    fn is_open(&self) -> bool {
        self.nav.is_some()
    }

    fn handle_key(&mut self, key: &KeyEvent, out: &mut Output<'_>) -> KeyDisposition {
        let Some(nav) = self.nav.as_mut() else {
            return KeyDisposition::Ignored;
        };
        let Some(response) = nav.handle_key(key) else {
            return KeyDisposition::Ignored;
        };
        out.deliver(&response);

        let id = match response.action {
            None => return KeyDisposition::Consumed,
            Some(TreeAction::Exit) => return KeyDisposition::Closed,
            Some(TreeAction::Activate(id)) => id,
        };

        let outcome = match nav.node_by_id(&id) {
            Some(node) => self.handler.activate(node, out),
            None => Activation::Stay,
        };
        tracing::debug!(menu = %self.name, node = %id, ?outcome, "activation handled");
        match outcome {
            Activation::Stay => KeyDisposition::Consumed,
            Activation::Close => KeyDisposition::Closed,
            Activation::Rebuild => self.rebuild(out),
        }
    }
}
