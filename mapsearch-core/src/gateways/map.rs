use crate::entities::MapScene;

pub trait MapRenderer {
    fn render(&self, scene: &MapScene, animated: bool);
}
