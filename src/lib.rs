// src/lib.rs

use sqlx::{Pool, Postgres};

// Módulos da aplicação. Cada pasta tem um `<area>_router.rs` com as rotas,
// um `<area>_structs.rs` com as structs e, quando há regra de negócio,
// um `<area>_service.rs` com a lógica que fala com o banco.
pub mod carrinho; // Módulo do carrinho de compras
pub mod categorias; // Módulo de categorias
pub mod produtos; // Módulo de produtos
pub mod shared; // Módulo shared
pub mod usuarios; // Módulo de usuários
pub mod vendas; // Módulo de vendas

/// Estado compartilhado que contém a conexão com o banco de dados e a chave
/// secreta JWT. Construído uma única vez em `main` e injetado nas rotas via
/// `web::Data`.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
    pub jwt_secret: String, // Chave secreta para JWT
}
