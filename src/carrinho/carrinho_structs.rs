// src/carrinho/carrinho_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura para receber um item nas requisições de adicionar/atualizar
/// e na sincronização do carrinho.
#[derive(Deserialize, Serialize, Clone)]
pub struct ItemCarrinho {
    pub produto_id: i32,
    pub quantidade: i32,
}

/// Corpo da requisição de sincronização: a lista completa de itens que deve
/// substituir o conteúdo atual do carrinho.
#[derive(Deserialize)]
pub struct SincronizacaoCarrinho {
    pub itens: Vec<ItemCarrinho>,
}

/// Um item do carrinho já resolvido com os dados atuais do produto.
#[derive(Serialize, FromRow)]
pub struct ItemCarrinhoView {
    pub produto_id: i32,
    pub nome: String,
    pub preco: BigDecimal,
    pub quantidade: i32,
}

/// Visão completa do carrinho de um usuário, com o preço total calculado
/// na hora a partir do preço atual de cada produto.
#[derive(Serialize)]
pub struct CarrinhoView {
    pub id: i32,
    pub usuario_id: i32,
    pub itens: Vec<ItemCarrinhoView>,
    pub preco_total: BigDecimal,
}
