// src/carrinho/mod.rs

// Structs do carrinho persistido e de suas requisições
pub mod carrinho_structs;
// Regras de negócio do carrinho (validação de estoque, criação sob demanda)
pub mod carrinho_service;
// Rotas HTTP do carrinho
pub mod carrinho_router;
