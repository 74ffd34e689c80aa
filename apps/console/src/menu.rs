use anyhow::Result;
use async_trait::async_trait;

pub type MenuExit = Option<()>;
pub const MENU_EXIT: MenuExit = None;
pub const MENU_LOOP: MenuExit = Some(());

/// A text menu. `enter` renders one pass and says whether to come back;
/// errors are displayed inline and the menu re-enters, so every failed
/// operation is terminal only to itself.
#[async_trait]
pub trait Menu {
    async fn enter(&mut self) -> Result<MenuExit>;

    async fn enter_loop(&mut self) {
        while let Some(result) = self.enter().await.transpose() {
            if let Err(error) = result {
                eprintln!("Error: {error}");
            }
        }
    }
}
